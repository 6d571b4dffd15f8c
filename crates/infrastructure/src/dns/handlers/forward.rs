use crate::dns::forwarding::MessageBuilder;
use crate::dns::lookup::ForwardLookup;
use async_trait::async_trait;
use hexcamp_application::ports::{DnsHandler, HandlerStatus, ResponseWriter};
use hexcamp_application::RequestContext;
use hexcamp_domain::{DnsRequest, DomainError};
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::{debug, error};

/// Proxies whatever reaches it to the upstream servers and relays the
/// reply under the client's id.
pub struct ForwardHandler {
    lookup: Arc<ForwardLookup>,
}

impl ForwardHandler {
    pub fn new(lookup: Arc<ForwardLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl DnsHandler for ForwardHandler {
    fn name(&self) -> &'static str {
        "forward"
    }

    async fn serve_dns(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        message: &Message,
        writer: &mut dyn ResponseWriter,
    ) -> Result<HandlerStatus, DomainError> {
        let upstream = self
            .lookup
            .exchange(ctx, &request.domain, &request.record_type, request.dns_class)
            .await?;

        let mut response = MessageBuilder::response_to(message);
        response.set_recursion_available(upstream.recursion_available());
        response.set_response_code(upstream.response_code());
        response.add_answers(upstream.answers().iter().cloned());
        response.add_name_servers(upstream.name_servers().iter().cloned());

        debug!(
            domain = %request.domain,
            rcode = ?upstream.response_code(),
            answers = upstream.answers().len(),
            "Forwarded query answered"
        );

        if let Err(e) = writer.write_message(response) {
            error!(domain = %request.domain, error = %e, "Failed to write forwarded response");
        }

        Ok(HandlerStatus::Handled)
    }
}
