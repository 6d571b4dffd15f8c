#![allow(dead_code)]

mod builders;
mod dns_server_mock;
mod mock_handlers;

pub use builders::*;
pub use dns_server_mock::{MockDnsServer, MockUpstreamReply};
pub use mock_handlers::{FailingHandler, RecordingHandler, StaticLookup};
