//! Book Group Entity
//!
//! Highlights aggregated per normalized book within a single sync pass.
//! Groups are rebuilt from scratch every pass and never persisted.

use std::collections::HashMap;

use crate::domain::value_objects::{BookKey, Watermark};

use super::HighlightRecord;

/// All highlights of one book seen in the current pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookGroup {
    pub key: BookKey,
    pub title: String,
    pub author: String,
    /// Highlight texts in fetch order
    pub highlights: Vec<String>,
}

/// Ordered collection of book groups plus the pass bookkeeping.
///
/// Groups iterate in order of first appearance in the fetch, which keeps
/// repeated runs over the same input fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct BookGroups {
    groups: Vec<BookGroup>,
    index: HashMap<BookKey, usize>,
    record_count: usize,
    max_position: i64,
}

impl BookGroups {
    /// Group `records` by book key, tracking the highest position seen.
    ///
    /// `max_position` is seeded with the current watermark so an empty or
    /// stale batch can never move it backwards.
    pub fn collect(records: &[HighlightRecord], seed: Watermark) -> Self {
        let mut groups = Self {
            max_position: seed.position(),
            ..Self::default()
        };
        for record in records {
            groups.push(record);
        }
        groups
    }

    fn push(&mut self, record: &HighlightRecord) {
        let key = record.book_key();
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.groups.push(BookGroup {
                    key: key.clone(),
                    title: record.book_title.clone(),
                    author: record.book_author.clone(),
                    highlights: Vec::new(),
                });
                let slot = self.groups.len() - 1;
                self.index.insert(key, slot);
                slot
            }
        };

        self.groups[slot].highlights.push(record.text.clone());
        self.record_count += 1;
        self.max_position = self.max_position.max(record.position);
    }

    /// Number of records grouped
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Number of distinct books
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Highest record position observed, never below the seed watermark
    pub fn max_position(&self) -> i64 {
        self.max_position
    }

    pub fn get(&self, key: &BookKey) -> Option<&BookGroup> {
        self.index.get(key).map(|&slot| &self.groups[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookGroup> {
        self.groups.iter()
    }
}
