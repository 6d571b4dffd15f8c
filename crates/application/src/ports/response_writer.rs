use hexcamp_domain::DomainError;
use hickory_proto::op::Message;

/// Sink for the single outbound message of a request.
pub trait ResponseWriter: Send {
    fn write_message(&mut self, message: Message) -> Result<(), DomainError>;
}
