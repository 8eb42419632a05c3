//! Sync Report
//!
//! Outcome of one sync pass, reported regardless of success.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::value_objects::Watermark;

/// Which records a pass fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassMode {
    /// Records above the current watermark
    Incremental,
    /// Every record in the source
    Full,
}

/// What happened to the durable watermark at the end of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkUpdate {
    /// No record above the starting watermark was seen
    Unchanged,
    /// The new watermark was saved
    Advanced(Watermark),
    /// Saving failed; the in-memory watermark was left where it was
    SaveFailed { attempted: Watermark, message: String },
}

/// Result of a single sync pass
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub mode: PassMode,
    /// Watermark at the start of the pass
    pub starting_watermark: Watermark,
    /// Records fetched
    pub records: usize,
    /// Distinct books among the fetched records
    pub books: usize,
    /// Artifacts created or replaced
    pub written: Vec<PathBuf>,
    /// Artifacts that already matched
    pub unchanged: Vec<PathBuf>,
    /// Per-book export failures
    pub export_errors: Vec<String>,
    pub watermark: WatermarkUpdate,
}

impl SyncReport {
    pub fn new(mode: PassMode, starting_watermark: Watermark) -> Self {
        Self {
            mode,
            starting_watermark,
            records: 0,
            books: 0,
            written: Vec::new(),
            unchanged: Vec::new(),
            export_errors: Vec::new(),
            watermark: WatermarkUpdate::Unchanged,
        }
    }

    /// True when the source had nothing new
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Export errors plus a failed watermark save
    pub fn error_count(&self) -> usize {
        let save_failed = matches!(self.watermark, WatermarkUpdate::SaveFailed { .. });
        self.export_errors.len() + usize::from(save_failed)
    }

    pub fn is_success(&self) -> bool {
        self.error_count() == 0
    }

    /// Whether the watermark save failed
    pub fn save_failed(&self) -> bool {
        matches!(self.watermark, WatermarkUpdate::SaveFailed { .. })
    }

    /// Watermark in effect after the pass
    pub fn final_watermark(&self) -> Watermark {
        match self.watermark {
            WatermarkUpdate::Advanced(w) => w,
            _ => self.starting_watermark,
        }
    }
}
