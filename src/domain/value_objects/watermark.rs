//! Watermark Value Object
//!
//! The durable high-water mark: every record at or below this position has
//! already been exported.

use std::fmt;

/// Position of the last record a completed sync pass persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Watermark(i64);

impl Watermark {
    /// The starting watermark when nothing has been exported yet
    pub const ZERO: Watermark = Watermark(0);

    pub fn new(position: i64) -> Self {
        Self(position)
    }

    /// The raw record position
    pub fn position(self) -> i64 {
        self.0
    }

    /// Whether a record at `position` is new relative to this watermark
    pub fn admits(self, position: i64) -> bool {
        position > self.0
    }

    /// Returns the advanced watermark if `observed` lies strictly above this one.
    ///
    /// Never yields a lower value, so callers can persist the result without
    /// re-checking monotonicity.
    pub fn advanced_to(self, observed: i64) -> Option<Watermark> {
        (observed > self.0).then_some(Watermark(observed))
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Watermark {
    fn from(position: i64) -> Self {
        Self(position)
    }
}
