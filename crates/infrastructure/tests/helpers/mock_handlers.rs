use async_trait::async_trait;
use hexcamp_application::ports::{DnsHandler, HandlerStatus, ResponseWriter, UpstreamLookup};
use hexcamp_application::RequestContext;
use hexcamp_domain::{DnsRequest, DomainError, QueryOrigin, RecordType};
use hexcamp_infrastructure::dns::forwarding::MessageBuilder;
use hickory_proto::op::Message;
use hickory_proto::rr::Record;
use std::sync::Mutex;

/// Upstream lookup with a canned result.
pub struct StaticLookup {
    result: Result<Option<Message>, DomainError>,
    calls: Mutex<Vec<String>>,
}

impl StaticLookup {
    pub fn new(result: Result<Option<Message>, DomainError>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamLookup for StaticLookup {
    async fn lookup(
        &self,
        _ctx: &RequestContext,
        _request: &DnsRequest,
        name: &str,
        _record_type: RecordType,
    ) -> Result<Option<Message>, DomainError> {
        self.calls.lock().unwrap().push(name.to_string());
        self.result.clone()
    }
}

/// Records every request it sees. Answers with `answers` when given,
/// defers otherwise.
pub struct RecordingHandler {
    answers: Option<Vec<Record>>,
    seen: Mutex<Vec<(String, QueryOrigin)>>,
}

impl RecordingHandler {
    pub fn deferring() -> Self {
        Self {
            answers: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(answers: Vec<Record>) -> Self {
        Self {
            answers: Some(answers),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<(String, QueryOrigin)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsHandler for RecordingHandler {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn serve_dns(
        &self,
        _ctx: &RequestContext,
        request: &DnsRequest,
        message: &Message,
        writer: &mut dyn ResponseWriter,
    ) -> Result<HandlerStatus, DomainError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.domain.to_string(), request.origin));

        match &self.answers {
            Some(answers) => {
                let mut response = MessageBuilder::response_to(message);
                response.add_answers(answers.clone());
                writer.write_message(response)?;
                Ok(HandlerStatus::Handled)
            }
            None => Ok(HandlerStatus::Deferred),
        }
    }
}

pub struct FailingHandler {
    error: DomainError,
}

impl FailingHandler {
    pub fn new(error: DomainError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl DnsHandler for FailingHandler {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn serve_dns(
        &self,
        _ctx: &RequestContext,
        _request: &DnsRequest,
        _message: &Message,
        _writer: &mut dyn ResponseWriter,
    ) -> Result<HandlerStatus, DomainError> {
        Err(self.error.clone())
    }
}
