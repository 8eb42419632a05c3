//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod watermark;

pub use watermark::{JsonWatermarkStore, STATE_FILE};
