use crate::dns::chain::HandlerChain;
use crate::dns::forwarding::MessageBuilder;
use crate::dns::response_writer::BufferedResponseWriter;
use async_trait::async_trait;
use hexcamp_application::ports::UpstreamLookup;
use hexcamp_application::RequestContext;
use hexcamp_domain::{DnsRequest, DomainError, RecordType};
use hickory_proto::op::Message;
use std::sync::Weak;
use tracing::debug;

/// Resolves the canonical name through this server's own handler chain.
///
/// The request is tagged canonical, so rewriting handlers pass it along
/// instead of handling it again.
pub struct ChainLookup {
    chain: Weak<HandlerChain>,
}

impl ChainLookup {
    pub fn new(chain: Weak<HandlerChain>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl UpstreamLookup for ChainLookup {
    async fn lookup(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<Message>, DomainError> {
        let chain = self
            .chain
            .upgrade()
            .ok_or_else(|| DomainError::Transport("handler chain is gone".to_string()))?;

        let message = MessageBuilder::query_message(name, &record_type, request.dns_class)?;
        let canonical = DnsRequest::new(name, record_type, request.client_ip)
            .with_class(request.dns_class)
            .canonical();

        let mut writer = BufferedResponseWriter::new();
        let result = chain.dispatch(ctx, &canonical, &message, &mut writer).await;

        match result {
            Err(e) if e.is_request_abort() => Err(e),
            result => match writer.into_message() {
                Some(reply) => {
                    debug!(name = %name, rcode = ?reply.response_code(), "Chain lookup answered");
                    Ok(Some(reply))
                }
                None => result.map(|_| None),
            },
        }
    }
}
