//! Marginalia - incremental Apple Books highlight export
//!
//! Marginalia reads highlights from the Apple Books SQLite databases and
//! keeps one Markdown file per book in a notes vault. A persisted watermark
//! (the largest exported annotation key) makes every pass incremental; the
//! watch loop coalesces bursts of database writes into single passes.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

// Re-exports for convenience
pub use application::{SyncPass, SyncReport, SyncState, WatchEvent, WatchUseCase};
pub use config::Config;
pub use domain::entities::HighlightRecord;
pub use domain::value_objects::{BookKey, Watermark};
pub use error::{MarginaliaError, MarginaliaResult};
