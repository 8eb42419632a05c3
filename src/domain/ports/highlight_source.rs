//! HighlightSource port - read access to highlight records
//!
//! Any backing store (SQLite, flat file, remote API) that can deliver
//! records in ascending position order satisfies this contract.

use crate::domain::entities::HighlightRecord;
use crate::domain::value_objects::Watermark;
use crate::error::MarginaliaResult;

/// Read-only source of highlight records
pub trait HighlightSource {
    /// All records with `position > after`, ascending by position.
    ///
    /// An empty list is a normal outcome. Connectivity or query failures
    /// must surface as `MarginaliaError::SourceUnavailable`.
    fn fetch_since(&self, after: Watermark) -> MarginaliaResult<Vec<HighlightRecord>>;

    /// Every record, ascending by position (full re-export)
    fn fetch_all(&self) -> MarginaliaResult<Vec<HighlightRecord>>;
}

impl<T: HighlightSource + ?Sized> HighlightSource for &T {
    fn fetch_since(&self, after: Watermark) -> MarginaliaResult<Vec<HighlightRecord>> {
        (**self).fetch_since(after)
    }

    fn fetch_all(&self) -> MarginaliaResult<Vec<HighlightRecord>> {
        (**self).fetch_all()
    }
}
