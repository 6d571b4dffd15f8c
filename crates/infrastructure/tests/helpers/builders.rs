use hexcamp_application::ports::UpstreamLookup;
use hexcamp_application::use_cases::SynthesizeCellAnswerUseCase;
use hexcamp_application::RequestContext;
use hexcamp_domain::{QueryNameMatcher, RecordType};
use hexcamp_infrastructure::dns::forwarding::MessageBuilder;
use hexcamp_infrastructure::dns::{HandlerStats, HexcampHandler};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const SUFFIX: &str = "test.hex.camp";
pub const REFERENCE_NAME: &str = "uxirkffr.test.hex.camp.";
pub const REFERENCE_TARGET: &str = "3.4.5.4.2.4.2.1.2.4.46.h3.test.hex.camp.";

pub fn client_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100))
}

pub fn ctx() -> RequestContext {
    RequestContext::new(Duration::from_secs(5))
}

pub fn query(name: &str, record_type: RecordType) -> Message {
    MessageBuilder::query_message(name, &record_type, 1).unwrap()
}

pub fn a_record(owner: &str, address: Ipv4Addr) -> Record {
    Record::from_rdata(Name::from_str(owner).unwrap(), 60, RData::A(A(address)))
}

pub fn upstream_message(code: ResponseCode, answers: Vec<Record>) -> Message {
    let mut message = Message::new(0, MessageType::Response, OpCode::Query);
    message.set_response_code(code);
    message.add_answers(answers);
    message
}

pub fn hexcamp_handler(lookup: Arc<dyn UpstreamLookup>) -> (Arc<HexcampHandler>, Arc<HandlerStats>) {
    let matcher = QueryNameMatcher::new(SUFFIX).unwrap();
    let use_case = Arc::new(SynthesizeCellAnswerUseCase::new(matcher, lookup));
    let stats = Arc::new(HandlerStats::new());
    (Arc::new(HexcampHandler::new(use_case, stats.clone())), stats)
}
