//! In-memory port implementations for application tests

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::domain::entities::HighlightRecord;
use crate::domain::ports::{ArtifactWriter, HighlightSource, WatermarkStore, WriteOutcome};
use crate::domain::value_objects::{BookKey, Watermark};
use crate::error::{MarginaliaError, MarginaliaResult};

/// Source backed by a vector, with optional outage simulation
#[derive(Default)]
pub struct MemorySource {
    records: RefCell<Vec<HighlightRecord>>,
    unavailable: Cell<bool>,
    fetches: Cell<usize>,
}

impl MemorySource {
    pub fn new(records: Vec<HighlightRecord>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    pub fn push(&self, record: HighlightRecord) {
        self.records.borrow_mut().push(record);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl HighlightSource for MemorySource {
    fn fetch_since(&self, after: Watermark) -> MarginaliaResult<Vec<HighlightRecord>> {
        self.fetches.set(self.fetches.get() + 1);
        if self.unavailable.get() {
            return Err(MarginaliaError::source_unavailable("database is locked"));
        }
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

/// Writer that renders into a map and can fail for chosen titles
#[derive(Default)]
pub struct RecordingWriter {
    artifacts: RefCell<BTreeMap<String, String>>,
    calls: RefCell<Vec<String>>,
    failing: RefCell<HashSet<String>>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, title: &str) {
        self.failing.borrow_mut().insert(title.to_string());
    }

    /// Rendered artifact for a book key
    pub fn artifact(&self, key: &str) -> Option<String> {
        self.artifacts.borrow().get(key).cloned()
    }

    pub fn artifact_keys(&self) -> Vec<String> {
        self.artifacts.borrow().keys().cloned().collect()
    }

    /// Titles passed to `write`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ArtifactWriter for RecordingWriter {
    fn write(
        &self,
        title: &str,
        author: &str,
        highlights: &[String],
    ) -> MarginaliaResult<WriteOutcome> {
        self.calls.borrow_mut().push(title.to_string());
        if self.failing.borrow().contains(title) {
            return Err(MarginaliaError::write_error(title, "simulated failure"));
        }

        let key = BookKey::from_title(title);
        let content = format!("# {title}\n{author}\n{}\n", highlights.join("\n"));
        let path = PathBuf::from(key.file_name());
        let previous = self
            .artifacts
            .borrow_mut()
            .insert(key.to_string(), content.clone());

        if previous.as_deref() == Some(content.as_str()) {
            Ok(WriteOutcome::Unchanged(path))
        } else {
            Ok(WriteOutcome::Written(path))
        }
    }
}

/// Watermark store in memory, optionally refusing to save
#[derive(Default)]
pub struct MemoryStore {
    value: Cell<Watermark>,
    fail_saves: Cell<bool>,
    fail_loads: Cell<bool>,
    saves: RefCell<Vec<Watermark>>,
}

impl MemoryStore {
    pub fn new(value: Watermark) -> Self {
        Self {
            value: Cell::new(value),
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.set(fail);
    }

    /// Every watermark successfully saved, in order
    pub fn saves(&self) -> Vec<Watermark> {
        self.saves.borrow().clone()
    }
}

impl WatermarkStore for MemoryStore {
    fn load(&self) -> MarginaliaResult<Watermark> {
        if self.fail_loads.get() {
            return Err(std::io::Error::other("permission denied").into());
        }
        Ok(self.value.get())
    }

    fn save(&self, watermark: Watermark) -> MarginaliaResult<()> {
        if self.fail_saves.get() {
            return Err(std::io::Error::other("read-only file system").into());
        }
        self.value.set(watermark);
        self.saves.borrow_mut().push(watermark);
        Ok(())
    }
}
