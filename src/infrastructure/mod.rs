//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Atomic writes, hashing, home expansion, vault lock
//! - `repositories/` - Watermark persistence (JSON state file)
//! - `source/` - SQLite highlight source with optional staging
//! - `writer/` - Markdown artifact writer
//! - `watcher` - notify-based change signals for the watch loop

pub mod fs;
pub mod repositories;
pub mod source;
pub mod watcher;
pub mod writer;

pub use fs::VaultLock;
pub use repositories::JsonWatermarkStore;
pub use source::{DbLocation, DbStager, SqliteHighlightSource};
pub use watcher::SourceWatcher;
pub use writer::{ArtifactTemplate, MarkdownArtifactWriter};
