use crate::dns::chain::HandlerChain;
use crate::dns::forwarding::MessageBuilder;
use crate::dns::response_writer::{BufferedResponseWriter, LoggingResponseWriter};
use hexcamp_application::RequestContext;
use hexcamp_domain::DomainError;
use hickory_proto::op::{Message, MessageType};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error};

/// Turns one inbound packet into at most one outbound packet.
#[derive(Clone)]
pub struct DnsServerHandler {
    chain: Arc<HandlerChain>,
}

impl DnsServerHandler {
    pub fn new(chain: Arc<HandlerChain>) -> Self {
        Self { chain }
    }

    /// Returns the serialized reply, or `None` when nothing should be sent.
    pub async fn handle_raw(
        &self,
        ctx: &RequestContext,
        packet: &[u8],
        client_ip: IpAddr,
    ) -> Option<Vec<u8>> {
        let message = match Message::from_vec(packet) {
            Ok(message) => message,
            Err(e) => {
                debug!(client = %client_ip, error = %e, "Malformed DNS packet");
                let id = packet.get(..2).map(|b| u16::from_be_bytes([b[0], b[1]]))?;
                return serialize(&MessageBuilder::format_error(id));
            }
        };

        if message.message_type() != MessageType::Query {
            debug!(client = %client_ip, id = message.id(), "Ignoring non-query message");
            return None;
        }

        let mut writer = LoggingResponseWriter::new(BufferedResponseWriter::new());
        match self.chain.serve(ctx, &message, client_ip, &mut writer).await {
            Ok(_) => {}
            Err(DomainError::Cancelled) => {
                debug!(client = %client_ip, id = message.id(), "Request cancelled");
                return None;
            }
            Err(e) => {
                debug!(client = %client_ip, id = message.id(), error = %e, "Request finished with error");
            }
        }

        let reply = writer.into_inner().into_message()?;
        serialize(&reply)
    }
}

fn serialize(message: &Message) -> Option<Vec<u8>> {
    match MessageBuilder::serialize_message(message) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(id = message.id(), error = %e, "Failed to serialize response");
            None
        }
    }
}
