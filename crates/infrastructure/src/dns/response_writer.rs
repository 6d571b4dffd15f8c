use hexcamp_application::ports::ResponseWriter;
use hexcamp_domain::DomainError;
use hickory_proto::op::Message;
use tracing::debug;

/// Holds the one reply a request may produce.
#[derive(Debug, Default)]
pub struct BufferedResponseWriter {
    message: Option<Message>,
}

impl BufferedResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_written(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn into_message(self) -> Option<Message> {
        self.message
    }
}

impl ResponseWriter for BufferedResponseWriter {
    fn write_message(&mut self, message: Message) -> Result<(), DomainError> {
        if self.message.is_some() {
            return Err(DomainError::ResponseAlreadyWritten);
        }
        self.message = Some(message);
        Ok(())
    }
}

/// Logs every outbound reply before handing it to the wrapped writer.
pub struct LoggingResponseWriter<W> {
    inner: W,
}

impl<W: ResponseWriter> LoggingResponseWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: ResponseWriter> ResponseWriter for LoggingResponseWriter<W> {
    fn write_message(&mut self, message: Message) -> Result<(), DomainError> {
        debug!(
            id = message.id(),
            rcode = ?message.response_code(),
            answers = message.answers().len(),
            authoritative = message.authoritative(),
            "Writing response"
        );
        self.inner.write_message(message)
    }
}
