//! Value Objects
//!
//! Immutable, self-validating types used by the sync pass.

mod book_key;
mod watermark;

pub use book_key::BookKey;
pub use watermark::Watermark;
