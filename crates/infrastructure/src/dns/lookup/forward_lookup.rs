use crate::dns::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use crate::dns::transport::{DnsTransport, TcpTransport, TransportResponse, UdpTransport};
use async_trait::async_trait;
use hexcamp_application::ports::UpstreamLookup;
use hexcamp_application::RequestContext;
use hexcamp_domain::{DnsRequest, DomainError, RecordType};
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};

/// Sends queries straight to the configured upstream servers.
///
/// Servers are tried in order and the first reply wins. Each attempt is
/// bounded by the per-server timeout and by what is left of the request
/// deadline.
pub struct ForwardLookup {
    servers: Vec<SocketAddr>,
    timeout: Duration,
}

impl ForwardLookup {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self { servers, timeout }
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    pub async fn exchange(
        &self,
        ctx: &RequestContext,
        name: &str,
        record_type: &RecordType,
        dns_class: u16,
    ) -> Result<Message, DomainError> {
        if self.servers.is_empty() {
            return Err(DomainError::NoUpstreams);
        }

        let (id, query_bytes) = MessageBuilder::build_query_with_id(name, record_type, dns_class)?;
        let mut last_error = DomainError::NoUpstreams;

        for server in &self.servers {
            if let Some(abort) = ctx.done_error() {
                return Err(abort);
            }

            let budget = self.timeout.min(ctx.remaining());
            match ctx.run(query_server(*server, id, &query_bytes, budget)).await {
                Ok(response) => {
                    debug!(
                        server = %server,
                        name = %name,
                        rcode = ResponseParser::rcode_to_status(response.rcode),
                        "Upstream answered"
                    );
                    return Ok(response.message);
                }
                Err(e) if e.is_request_abort() => return Err(e),
                Err(e) => {
                    warn!(server = %server, name = %name, error = %e, "Upstream query failed");
                    last_error = e;
                }
            }
        }

        Err(ctx.done_error().unwrap_or(last_error))
    }
}

async fn query_server(
    server: SocketAddr,
    id: u16,
    query_bytes: &[u8],
    timeout: Duration,
) -> Result<DnsResponse, DomainError> {
    let reply = UdpTransport::new(server).send(query_bytes, timeout).await?;
    let response = parse_transport_reply(server, &reply, id)?;
    if !response.truncated {
        return Ok(response);
    }

    debug!(server = %server, "Truncated UDP reply, retrying over TCP");
    let reply = TcpTransport::new(server).send(query_bytes, timeout).await?;
    parse_transport_reply(server, &reply, id)
}

fn parse_transport_reply(
    server: SocketAddr,
    reply: &TransportResponse,
    id: u16,
) -> Result<DnsResponse, DomainError> {
    let response = ResponseParser::parse_reply(&reply.bytes, id)?;
    debug!(
        server = %server,
        protocol = reply.protocol_used,
        rcode = ResponseParser::rcode_to_status(response.rcode),
        "Upstream reply parsed"
    );
    Ok(response)
}

#[async_trait]
impl UpstreamLookup for ForwardLookup {
    async fn lookup(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<Message>, DomainError> {
        self.exchange(ctx, name, &record_type, request.dns_class)
            .await
            .map(Some)
    }
}
