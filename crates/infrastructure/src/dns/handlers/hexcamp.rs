use crate::dns::forwarding::MessageBuilder;
use crate::dns::stats::HandlerStats;
use async_trait::async_trait;
use hexcamp_application::ports::{DnsHandler, HandlerStatus, ResponseWriter};
use hexcamp_application::use_cases::{Synthesis, SynthesizeCellAnswerUseCase};
use hexcamp_application::RequestContext;
use hexcamp_domain::{DnsRequest, DomainError};
use hickory_proto::op::Message;
use std::sync::Arc;
use tracing::{debug, error};

/// Answers names under the configured suffix with the synthesized geocell
/// CNAME, plus the recursive answer for address and text queries.
pub struct HexcampHandler {
    use_case: Arc<SynthesizeCellAnswerUseCase>,
    stats: Arc<HandlerStats>,
}

impl HexcampHandler {
    pub fn new(use_case: Arc<SynthesizeCellAnswerUseCase>, stats: Arc<HandlerStats>) -> Self {
        Self { use_case, stats }
    }
}

#[async_trait]
impl DnsHandler for HexcampHandler {
    fn name(&self) -> &'static str {
        "hexcamp"
    }

    async fn serve_dns(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        message: &Message,
        writer: &mut dyn ResponseWriter,
    ) -> Result<HandlerStatus, DomainError> {
        self.stats.record_request();

        let synthesis = match self.use_case.execute(ctx, request).await {
            Ok(synthesis) => synthesis,
            Err(e) => {
                self.stats.record_aborted();
                return Err(e);
            }
        };

        let answer = match synthesis {
            Synthesis::Deferred(reason) => {
                self.stats.record_deferred();
                debug!(domain = %request.domain, reason = reason.as_str(), "Deferring to next handler");
                return Ok(HandlerStatus::Deferred);
            }
            Synthesis::Answered(answer) => answer,
        };

        self.stats.record_synthesized(answer.lookup);

        let mut response = MessageBuilder::response_to(message);
        response.set_authoritative(true);
        response.add_answers(answer.answers);

        if let Err(e) = writer.write_message(response) {
            error!(domain = %request.domain, error = %e, "Failed to write synthesized response");
        }

        Ok(HandlerStatus::Handled)
    }
}
