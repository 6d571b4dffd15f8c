mod forward;
mod hexcamp;

pub use forward::ForwardHandler;
pub use hexcamp::HexcampHandler;
