//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries the sync engine drives.
//! Infrastructure provides the concrete implementations; tests provide fakes.

pub mod artifact_writer;
pub mod highlight_source;
pub mod watermark_store;

pub use artifact_writer::{ArtifactWriter, WriteOutcome};
pub use highlight_source::HighlightSource;
pub use watermark_store::WatermarkStore;
