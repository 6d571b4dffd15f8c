mod dns_handler;
mod response_writer;
mod upstream_lookup;

pub use dns_handler::{DnsHandler, HandlerStatus};
pub use response_writer::ResponseWriter;
pub use upstream_lookup::UpstreamLookup;

// Re-export for convenience
pub use hexcamp_domain::DnsRequest;
