//! Hexcamp Domain Layer
//!
//! Pure types and computation for the geocell name rewriter: configuration,
//! errors, the query-name matcher, the identifier decoder, the cell address
//! builder and the canonical-name renderer. Nothing in this crate performs I/O.
pub mod config;
pub mod dns_record;
pub mod dns_request;
pub mod errors;
pub mod hexcamp;

pub use config::{CliOverrides, Config, ConfigError, HexcampConfig};
pub use dns_record::{RecordType, SynthesisPlan};
pub use dns_request::{DnsRequest, QueryOrigin};
pub use errors::DomainError;
pub use hexcamp::{
    decode_identifier, CanonicalName, CellAddress, DecodedBuffer, NameMatch, PathSegments,
    QueryNameMatcher, MARKER_LABEL,
};
