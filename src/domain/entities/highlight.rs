//! Highlight Record Entity

use serde::Serialize;

use crate::domain::value_objects::BookKey;

/// One highlight as delivered by a highlight source.
///
/// `position` is unique and totally ordered; it is the only identity a
/// record has and the basis for "new since the last pass".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightRecord {
    pub position: i64,
    pub book_title: String,
    pub book_author: String,
    pub text: String,
}

impl HighlightRecord {
    pub fn new(
        position: i64,
        book_title: impl Into<String>,
        book_author: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            position,
            book_title: book_title.into(),
            book_author: book_author.into(),
            text: text.into(),
        }
    }

    /// Normalized key of the book this highlight belongs to
    pub fn book_key(&self) -> BookKey {
        BookKey::from_title(&self.book_title)
    }
}
