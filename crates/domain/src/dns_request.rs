use super::RecordType;
use std::net::IpAddr;
use std::sync::Arc;

/// Where a request entered the handler chain.
///
/// `Canonical` marks a lookup this server issued itself for an already
/// synthesized name; handlers that rewrite names must leave it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryOrigin {
    #[default]
    Client,
    Canonical,
}

#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub dns_class: u16,
    pub client_ip: IpAddr,
    pub origin: QueryOrigin,
}

impl DnsRequest {
    pub const CLASS_IN: u16 = 1;

    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType, client_ip: IpAddr) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            dns_class: Self::CLASS_IN,
            client_ip,
            origin: QueryOrigin::Client,
        }
    }

    pub fn with_class(mut self, dns_class: u16) -> Self {
        self.dns_class = dns_class;
        self
    }

    pub fn canonical(mut self) -> Self {
        self.origin = QueryOrigin::Canonical;
        self
    }

    pub fn is_canonical(&self) -> bool {
        self.origin == QueryOrigin::Canonical
    }
}
