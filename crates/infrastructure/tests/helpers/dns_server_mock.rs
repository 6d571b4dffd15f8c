use hexcamp_infrastructure::dns::forwarding::MessageBuilder;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub enum MockUpstreamReply {
    /// NOERROR with one A record for the question name.
    Address(Ipv4Addr),
    /// Empty reply with the given rcode.
    Rcode(ResponseCode),
    /// Reads queries and never answers.
    Silent,
}

/// UDP upstream on an ephemeral loopback port.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(reply: MockUpstreamReply) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = queries.clone();

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_mock_response(&buf[..len], &reply) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn build_mock_response(query: &[u8], reply: &MockUpstreamReply) -> Option<Vec<u8>> {
        let request = Message::from_vec(query).ok()?;
        let mut response = MessageBuilder::response_to(&request);
        response.set_recursion_available(true);

        match reply {
            MockUpstreamReply::Address(address) => {
                let owner = request.queries().first()?.name().clone();
                response.add_answer(Record::from_rdata(owner, 60, RData::A(A(*address))));
            }
            MockUpstreamReply::Rcode(code) => {
                response.set_response_code(*code);
            }
            MockUpstreamReply::Silent => return None,
        };

        MessageBuilder::serialize_message(&response).ok()
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
