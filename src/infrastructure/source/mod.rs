//! Highlight source implementations
//!
//! - `locate` - Resolve `dir` + glob to a concrete database file
//! - `staging` - Optional private copies of the live databases
//! - `sqlite` - The `HighlightSource` port over Apple Books' SQLite files

mod locate;
mod sqlite;
mod staging;

pub use locate::DbLocation;
pub use sqlite::{
    is_valid_alias, SqliteHighlightSource, ANNOTATION_TABLE, DEFAULT_ATTACH_ALIAS, LIBRARY_TABLE,
};
pub use staging::DbStager;
