//! Sync Pass implementation

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::domain::entities::{BookGroups, HighlightRecord};
use crate::domain::ports::{ArtifactWriter, HighlightSource, WatermarkStore, WriteOutcome};
use crate::domain::value_objects::Watermark;
use crate::error::MarginaliaResult;

use super::report::{PassMode, SyncReport, WatermarkUpdate};

/// Process-wide sync state
///
/// Initialized once per invocation. The watermark only moves after a
/// successful save, so a failed save makes the next pass re-fetch the same
/// records instead of silently skipping them after a restart.
#[derive(Debug, Clone)]
pub struct SyncState {
    watermark: Watermark,
    watched_path: Option<PathBuf>,
}

impl SyncState {
    pub fn new(watermark: Watermark) -> Self {
        Self {
            watermark,
            watched_path: None,
        }
    }

    /// Load the watermark from `store`, degrading to zero on any error.
    ///
    /// Losing the watermark only causes an idempotent re-export, so startup
    /// never aborts here.
    pub fn load(store: &impl WatermarkStore) -> Self {
        let watermark = match store.load() {
            Ok(watermark) => watermark,
            Err(e) => {
                warn!(error = %e, "could not read watermark, starting from 0");
                Watermark::ZERO
            }
        };
        Self::new(watermark)
    }

    pub fn with_watched_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.watched_path = Some(path.into());
        self
    }

    pub fn watermark(&self) -> Watermark {
        self.watermark
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.watched_path.as_deref()
    }
}

/// The transactional unit of work: fetch, group, write, persist.
///
/// Passes must never overlap for the same state; callers hold `&mut
/// SyncState` for the whole pass, which makes that a compile-time guarantee
/// inside one process.
pub struct SyncPass<S, W, M> {
    source: S,
    writer: W,
    store: M,
}

impl<S, W, M> SyncPass<S, W, M>
where
    S: HighlightSource,
    W: ArtifactWriter,
    M: WatermarkStore,
{
    pub fn new(source: S, writer: W, store: M) -> Self {
        Self {
            source,
            writer,
            store,
        }
    }

    /// Export every record above the current watermark.
    ///
    /// Returns `Err` only for pass-fatal failures (source unavailable); the
    /// watermark is untouched in that case.
    pub fn run(&self, state: &mut SyncState) -> MarginaliaResult<SyncReport> {
        let start = state.watermark;
        let records = self.source.fetch_since(start)?;
        // Guard against sources that ignore the lower bound
        let records: Vec<_> = records
            .into_iter()
            .filter(|r| start.admits(r.position))
            .collect();
        Ok(self.apply(PassMode::Incremental, &records, state))
    }

    /// Re-export every record in the source.
    ///
    /// Artifacts are rebuilt from the complete history; the watermark still
    /// only moves forward.
    pub fn run_full(&self, state: &mut SyncState) -> MarginaliaResult<SyncReport> {
        let records = self.source.fetch_all()?;
        Ok(self.apply(PassMode::Full, &records, state))
    }

    fn apply(
        &self,
        mode: PassMode,
        records: &[HighlightRecord],
        state: &mut SyncState,
    ) -> SyncReport {
        let start = state.watermark;
        let mut report = SyncReport::new(mode, start);

        if records.is_empty() {
            info!(watermark = %start, "no new highlights");
            return report;
        }

        let groups = BookGroups::collect(records, start);
        report.records = groups.record_count();
        report.books = groups.len();

        info!(
            records = report.records,
            books = report.books,
            max_position = groups.max_position(),
            "processing highlights"
        );

        for group in groups.iter() {
            match self
                .writer
                .write(&group.title, &group.author, &group.highlights)
            {
                Ok(WriteOutcome::Written(path)) => report.written.push(path),
                Ok(WriteOutcome::Unchanged(path)) => report.unchanged.push(path),
                Err(e) => {
                    error!(book = %group.title, error = %e, "export failed");
                    report.export_errors.push(e.to_string());
                }
            }
        }

        // Export failures do not hold the watermark back: artifacts are full
        // rewrites, so a failed book is repaired by any later pass that
        // touches it or by a full export.
        report.watermark = match start.advanced_to(groups.max_position()) {
            None => WatermarkUpdate::Unchanged,
            Some(next) => match self.store.save(next) {
                Ok(()) => {
                    info!(from = %start, to = %next, "watermark advanced");
                    state.watermark = next;
                    WatermarkUpdate::Advanced(next)
                }
                Err(e) => {
                    error!(attempted = %next, error = %e, "failed to save watermark");
                    WatermarkUpdate::SaveFailed {
                        attempted: next,
                        message: e.to_string(),
                    }
                }
            },
        };

        info!(
            records = report.records,
            books = report.books,
            errors = report.error_count(),
            "sync pass finished"
        );
        report
    }
}
