//! DNS Message Builder
//!
//! Constructs query and reply messages with `hickory-proto` and serializes
//! them to wire format.

use super::record_type_map::RecordTypeMapper;
use hexcamp_domain::{DomainError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// Builds DNS messages
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for `domain` with a random id.
    pub fn query_message(
        domain: &str,
        record_type: &RecordType,
        dns_class: u16,
    ) -> Result<Message, DomainError> {
        let mut name = Name::from_str(domain).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;
        name.set_fqdn(true);

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::from(dns_class));

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);
        Ok(message)
    }

    /// Build a query message and return both its id and wire bytes
    ///
    /// The id is needed to match the response.
    pub fn build_query_with_id(
        domain: &str,
        record_type: &RecordType,
        dns_class: u16,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let message = Self::query_message(domain, record_type, dns_class)?;
        let bytes = Self::serialize_message(&message)?;
        Ok((message.id(), bytes))
    }

    /// Reply skeleton for `request`: same id, opcode, RD flag and question.
    pub fn response_to(request: &Message) -> Message {
        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.add_queries(request.queries().iter().cloned());
        response
    }

    pub fn error_response(request: &Message, code: ResponseCode) -> Message {
        let mut response = Self::response_to(request);
        response.set_response_code(code);
        response
    }

    /// FORMERR for a packet whose body could not be parsed; only the id
    /// is known.
    pub fn format_error(id: u16) -> Message {
        let mut response = Message::new(id, MessageType::Response, OpCode::Query);
        response.set_response_code(ResponseCode::FormErr);
        response
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
