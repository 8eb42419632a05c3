//! Error types for Marginalia
//!
//! Uses `thiserror` for library errors; the binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Marginalia operations
pub type MarginaliaResult<T> = Result<T, MarginaliaError>;

/// Main error type for Marginalia operations
#[derive(Error, Debug)]
pub enum MarginaliaError {
    /// The highlight source could not be opened or queried.
    ///
    /// Fatal for the current pass; the watermark is left untouched.
    #[error("highlight source unavailable: {message}")]
    SourceUnavailable { message: String },

    /// No database file matched a configured source pattern
    #[error("no file matching '{pattern}' in {dir}")]
    SourceNotFound { dir: PathBuf, pattern: String },

    /// Writing one book's artifact failed; other books are unaffected
    #[error("failed to write highlights for '{book}': {message}")]
    WriteError { book: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// A required setting has no value after all config layers are applied
    #[error("missing required setting '{key}'")]
    MissingSetting { key: String },

    /// The filesystem watcher could not be set up
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Rendering a book artifact failed
    #[error("template error: {message}")]
    Template { message: String },

    /// Another process holds the vault lock
    #[error("vault {path} is locked by another marginalia process")]
    VaultLocked { path: PathBuf },
}

impl MarginaliaError {
    /// Wrap any displayable error as a `SourceUnavailable`
    pub fn source_unavailable(err: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable {
            message: err.to_string(),
        }
    }

    /// Build a `WriteError` for the given book title
    pub fn write_error(book: &str, err: impl std::fmt::Display) -> Self {
        Self::WriteError {
            book: book.to_string(),
            message: err.to_string(),
        }
    }

    /// Whether this error aborts the current sync pass
    pub fn is_pass_fatal(&self) -> bool {
        !matches!(self, Self::WriteError { .. })
    }
}

impl From<askama::Error> for MarginaliaError {
    fn from(err: askama::Error) -> Self {
        Self::Template {
            message: err.to_string(),
        }
    }
}

impl From<minijinja::Error> for MarginaliaError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template {
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for MarginaliaError {
    fn from(err: rusqlite::Error) -> Self {
        Self::source_unavailable(err)
    }
}
