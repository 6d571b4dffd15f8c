#![allow(dead_code)]

use async_trait::async_trait;
use hexcamp_application::ports::UpstreamLookup;
use hexcamp_application::RequestContext;
use hexcamp_domain::{DnsRequest, DomainError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

pub const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100));
pub const SUFFIX: &str = "test.hex.camp";
pub const REFERENCE_NAME: &str = "uxirkffr.test.hex.camp.";
pub const REFERENCE_TARGET: &str = "3.4.5.4.2.4.2.1.2.4.46.h3.test.hex.camp.";

#[derive(Clone)]
pub enum MockReply {
    Message(Message),
    Empty,
    Error(DomainError),
    /// Sleeps inside the request scope, so the request deadline wins.
    Hang,
}

pub struct MockUpstreamLookup {
    reply: MockReply,
    calls: Mutex<Vec<(String, RecordType)>>,
}

impl MockUpstreamLookup {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, RecordType)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamLookup for MockUpstreamLookup {
    async fn lookup(
        &self,
        ctx: &RequestContext,
        _request: &DnsRequest,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<Message>, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), record_type));

        match &self.reply {
            MockReply::Message(message) => Ok(Some(message.clone())),
            MockReply::Empty => Ok(None),
            MockReply::Error(e) => Err(e.clone()),
            MockReply::Hang => {
                ctx.run(async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(None)
                })
                .await
            }
        }
    }
}

pub fn upstream_reply(code: ResponseCode, addresses: &[Ipv4Addr]) -> Message {
    let mut message = Message::new(0, MessageType::Response, OpCode::Query);
    message.set_response_code(code);
    let owner = Name::from_str(REFERENCE_TARGET).unwrap();
    for address in addresses {
        message.add_answer(Record::from_rdata(owner.clone(), 60, RData::A(A(*address))));
    }
    message
}

pub fn request(name: &str, record_type: RecordType) -> DnsRequest {
    DnsRequest::new(name, record_type, CLIENT_IP)
}
