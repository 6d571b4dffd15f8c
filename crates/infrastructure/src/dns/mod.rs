pub mod chain;
pub mod forwarding;
pub mod handlers;
pub mod lookup;
pub mod response_writer;
pub mod server;
pub mod stats;
pub mod transport;

pub use chain::HandlerChain;
pub use handlers::{ForwardHandler, HexcampHandler};
pub use lookup::{ChainLookup, ForwardLookup};
pub use response_writer::{BufferedResponseWriter, LoggingResponseWriter};
pub use server::DnsServerHandler;
pub use stats::{HandlerStats, HandlerStatsSnapshot};
