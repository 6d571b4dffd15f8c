use super::ResponseWriter;
use crate::RequestContext;
use async_trait::async_trait;
use hexcamp_domain::{DnsRequest, DomainError};
use hickory_proto::op::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerStatus {
    /// A response was written; dispatch stops here.
    Handled,
    /// Not for this handler; the next one in the chain gets the request.
    Deferred,
}

#[async_trait]
pub trait DnsHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Serve one request. A `Deferred` result must leave `writer` untouched.
    async fn serve_dns(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        message: &Message,
        writer: &mut dyn ResponseWriter,
    ) -> Result<HandlerStatus, DomainError>;
}
