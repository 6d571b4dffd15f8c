//! Hexcamp Application Layer
//!
//! The response synthesizer and the ports its collaborators implement.
pub mod context;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use context::RequestContext;
