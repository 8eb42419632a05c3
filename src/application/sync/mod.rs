//! Sync Pass Use Case
//!
//! One complete fetch → group → write → persist cycle:
//!
//! 1. Read the in-memory watermark
//! 2. Fetch records above it (or everything, for a full export)
//! 3. Group by normalized book key
//! 4. Write one artifact per book, isolating per-book failures
//! 5. Persist the new watermark only if it advanced
//! 6. Report records / books / errors

mod event;
mod pass;
mod report;


pub use event::SyncEvent;
pub use pass::{SyncPass, SyncState};
pub use report::{PassMode, SyncReport, WatermarkUpdate};
