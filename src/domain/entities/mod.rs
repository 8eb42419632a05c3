//! Domain Entities

mod book_group;
mod highlight;

pub use book_group::{BookGroup, BookGroups};
pub use highlight::HighlightRecord;
