use crate::RequestContext;
use async_trait::async_trait;
use hexcamp_domain::{DnsRequest, DomainError, RecordType};
use hickory_proto::op::Message;

#[async_trait]
pub trait UpstreamLookup: Send + Sync {
    /// Resolve `name` with the given type on behalf of `request`.
    ///
    /// `Ok(None)` means no data and no error. A returned message carries
    /// its own response code (success, name error, server failure).
    async fn lookup(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<Message>, DomainError>;
}
