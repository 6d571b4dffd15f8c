use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid cell address: {0}")]
    InvalidCell(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("No upstream servers configured")]
    NoUpstreams,

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Response already written for this request")]
    ResponseAlreadyWritten,

    #[error("No next handler found for {0}")]
    NoNextHandler(String),
}

impl DomainError {
    /// True when the failure came from the request's own deadline or
    /// cancellation rather than from a collaborator.
    pub fn is_request_abort(&self) -> bool {
        matches!(self, DomainError::QueryTimeout | DomainError::Cancelled)
    }
}
