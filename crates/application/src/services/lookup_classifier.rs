use hexcamp_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RecordType;
use std::fmt;

/// Outcome of a recursive lookup, kept for logs and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupClass {
    Success,
    NameError,
    Delegation,
    NoData,
    ServerFailure,
}

impl LookupClass {
    pub const ALL: [LookupClass; 5] = [
        LookupClass::Success,
        LookupClass::NameError,
        LookupClass::Delegation,
        LookupClass::NoData,
        LookupClass::ServerFailure,
    ];

    pub fn classify(result: &Result<Option<Message>, DomainError>) -> Self {
        match result {
            Ok(Some(message)) => Self::of_message(message),
            Ok(None) => LookupClass::NoData,
            Err(_) => LookupClass::ServerFailure,
        }
    }

    pub fn of_message(message: &Message) -> Self {
        match message.response_code() {
            ResponseCode::NoError if !message.answers().is_empty() => LookupClass::Success,
            ResponseCode::NoError
                if message
                    .name_servers()
                    .iter()
                    .any(|record| record.record_type() == RecordType::NS) =>
            {
                LookupClass::Delegation
            }
            ResponseCode::NoError => LookupClass::NoData,
            ResponseCode::NXDomain => LookupClass::NameError,
            _ => LookupClass::ServerFailure,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LookupClass::Success => "SUCCESS",
            LookupClass::NameError => "NXDOMAIN",
            LookupClass::Delegation => "DELEGATION",
            LookupClass::NoData => "NODATA",
            LookupClass::ServerFailure => "SERVFAIL",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            LookupClass::Success => 0,
            LookupClass::NameError => 1,
            LookupClass::Delegation => 2,
            LookupClass::NoData => 3,
            LookupClass::ServerFailure => 4,
        }
    }
}

impl fmt::Display for LookupClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
