use crate::dns::forwarding::{MessageBuilder, RecordTypeMapper};
use hexcamp_application::ports::{DnsHandler, HandlerStatus, ResponseWriter};
use hexcamp_application::RequestContext;
use hexcamp_domain::{DnsRequest, DomainError};
use hickory_proto::op::{Message, ResponseCode};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Ordered list of handlers. The first one that handles a request stops
/// dispatch; a deferral moves on to the next.
pub struct HandlerChain {
    handlers: Vec<Arc<dyn DnsHandler>>,
}

impl HandlerChain {
    pub fn new(handlers: Vec<Arc<dyn DnsHandler>>) -> Self {
        Self { handlers }
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Entry point for a parsed client message.
    pub async fn serve(
        &self,
        ctx: &RequestContext,
        message: &Message,
        client_ip: IpAddr,
        writer: &mut dyn ResponseWriter,
    ) -> Result<HandlerStatus, DomainError> {
        let Some(query) = message.queries().first() else {
            debug!(id = message.id(), client = %client_ip, "Message without question");
            write_reply(writer, MessageBuilder::error_response(message, ResponseCode::FormErr));
            return Ok(HandlerStatus::Handled);
        };

        let record_type = RecordTypeMapper::from_hickory(query.query_type());
        let request = DnsRequest::new(query.name().to_utf8(), record_type, client_ip)
            .with_class(u16::from(query.query_class()));

        debug!(
            domain = %request.domain,
            record_type = %request.record_type,
            client = %client_ip,
            "DNS query received"
        );

        self.dispatch(ctx, &request, message, writer).await
    }

    /// Runs `request` through the handlers in order.
    ///
    /// When every handler defers, or one fails, a SERVFAIL reply is written.
    /// A cancelled request gets no reply.
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        message: &Message,
        writer: &mut dyn ResponseWriter,
    ) -> Result<HandlerStatus, DomainError> {
        for handler in &self.handlers {
            match handler.serve_dns(ctx, request, message, writer).await {
                Ok(HandlerStatus::Handled) => return Ok(HandlerStatus::Handled),
                Ok(HandlerStatus::Deferred) => {
                    debug!(handler = handler.name(), domain = %request.domain, "Handler deferred");
                }
                Err(DomainError::Cancelled) => return Err(DomainError::Cancelled),
                Err(e) => {
                    error!(handler = handler.name(), domain = %request.domain, error = %e, "Handler failed");
                    write_reply(writer, MessageBuilder::error_response(message, ResponseCode::ServFail));
                    return Err(e);
                }
            }
        }

        warn!(domain = %request.domain, origin = ?request.origin, "No handler answered");
        write_reply(writer, MessageBuilder::error_response(message, ResponseCode::ServFail));
        Err(DomainError::NoNextHandler(request.domain.to_string()))
    }
}

fn write_reply(writer: &mut dyn ResponseWriter, reply: Message) {
    if let Err(e) = writer.write_message(reply) {
        debug!(error = %e, "Failure reply not written");
    }
}
