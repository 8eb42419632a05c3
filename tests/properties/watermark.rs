//! Property tests for watermark monotonicity across sync passes.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use proptest::prelude::*;

use marginalia::application::{SyncPass, SyncState, WatermarkUpdate};
use marginalia::domain::ports::{ArtifactWriter, HighlightSource, WatermarkStore, WriteOutcome};
use marginalia::domain::value_objects::Watermark;
use marginalia::{HighlightRecord, MarginaliaError, MarginaliaResult};

#[derive(Default)]
struct VecSource {
    records: RefCell<Vec<HighlightRecord>>,
}

impl HighlightSource for VecSource {
    fn fetch_since(&self, after: Watermark) -> MarginaliaResult<Vec<HighlightRecord>> {
        let mut records: Vec<_> = self
            .records
            .borrow()
            .iter()
            .filter(|r| after.admits(r.position))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.position);
        Ok(records)
    }

    fn fetch_all(&self) -> MarginaliaResult<Vec<HighlightRecord>> {
        self.fetch_since(Watermark::new(i64::MIN))
    }
}

struct NullWriter;

impl ArtifactWriter for NullWriter {
    fn write(&self, title: &str, _: &str, _: &[String]) -> MarginaliaResult<WriteOutcome> {
        Ok(WriteOutcome::Written(PathBuf::from(title)))
    }
}

/// Store whose saves fail whenever `fail_next` is set
#[derive(Default)]
struct FlakyStore {
    saved: Cell<Option<Watermark>>,
    fail_next: Cell<bool>,
}

impl WatermarkStore for FlakyStore {
    fn load(&self) -> MarginaliaResult<Watermark> {
        Ok(self.saved.get().unwrap_or(Watermark::ZERO))
    }

    fn save(&self, watermark: Watermark) -> MarginaliaResult<()> {
        if self.fail_next.replace(false) {
            return Err(MarginaliaError::Io(std::io::Error::other("disk full")));
        }
        self.saved.set(Some(watermark));
        Ok(())
    }
}

/// One pass worth of new records plus whether the save should fail
fn batches() -> impl Strategy<Value = Vec<(Vec<i64>, bool)>> {
    let batch = (proptest::collection::vec(1i64..10_000, 0..8), any::<bool>());
    proptest::collection::vec(batch, 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The in-memory and persisted watermark never decrease, and
    /// the in-memory value only moves when a save succeeded.
    #[test]
    fn property_watermark_is_monotonic(batches in batches()) {
        let source = VecSource::default();
        let store = FlakyStore::default();
        let pass = SyncPass::new(&source, NullWriter, &store);
        let mut state = SyncState::load(&store);

        for (positions, fail_save) in batches {
            for p in positions {
                source
                    .records
                    .borrow_mut()
                    .push(HighlightRecord::new(p, "Dune", "Frank Herbert", format!("h{p}")));
            }
            store.fail_next.set(fail_save);

            let before = state.watermark();
            let persisted_before = store.load().unwrap();
            let report = pass.run(&mut state).unwrap();
            let after = state.watermark();

            prop_assert!(after >= before);
            prop_assert!(store.load().unwrap() >= persisted_before);
            match report.watermark {
                WatermarkUpdate::Advanced(w) => {
                    prop_assert_eq!(w, after);
                    prop_assert_eq!(store.load().unwrap(), after);
                }
                WatermarkUpdate::Unchanged | WatermarkUpdate::SaveFailed { .. } => {
                    prop_assert_eq!(after, before);
                }
            }
            store.fail_next.set(false);
        }
    }

    /// PROPERTY: After a successful pass nothing at or below the watermark
    /// is fetched again.
    #[test]
    fn property_successful_pass_drains_source(positions in proptest::collection::vec(1i64..500, 1..30)) {
        let source = VecSource::default();
        for p in &positions {
            source
                .records
                .borrow_mut()
                .push(HighlightRecord::new(*p, "Emma", "Jane Austen", "text"));
        }
        let store = FlakyStore::default();
        let pass = SyncPass::new(&source, NullWriter, &store);
        let mut state = SyncState::new(Watermark::ZERO);

        let first = pass.run(&mut state).unwrap();
        let second = pass.run(&mut state).unwrap();

        prop_assert_eq!(first.records, positions.len());
        prop_assert_eq!(state.watermark().position(), *positions.iter().max().unwrap());
        prop_assert_eq!(second.records, 0);
    }
}
