//! Handler implementations

pub mod stream;

pub use stream::{SharedWriter, StreamHandler, StreamTarget};

// Re-export the trait for convenience
pub use crate::core::Handler;
