mod chain_lookup;
mod forward_lookup;

pub use chain_lookup::ChainLookup;
pub use forward_lookup::ForwardLookup;
