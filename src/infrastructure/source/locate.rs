//! Resolve a database location from a directory and a file-name glob
//!
//! Apple Books names its databases with a version suffix
//! (`AEAnnotation_v10312011_1727.sqlite`), so locations are configured as a
//! pattern and resolved at open time.

use std::fs;
use std::path::PathBuf;

use ignore::gitignore::GitignoreBuilder;

use crate::error::{MarginaliaError, MarginaliaResult};

/// A directory plus a file-name pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbLocation {
    pub dir: PathBuf,
    pub pattern: String,
}

impl DbLocation {
    pub fn new(dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            pattern: pattern.into(),
        }
    }

    /// Lexically first regular file in `dir` whose name matches `pattern`
    pub fn resolve(&self) -> MarginaliaResult<PathBuf> {
        let not_found = || MarginaliaError::SourceNotFound {
            dir: self.dir.clone(),
            pattern: self.pattern.clone(),
        };

        let mut builder = GitignoreBuilder::new(&self.dir);
        builder
            .add_line(None, &self.pattern)
            .map_err(|e| MarginaliaError::source_unavailable(format!(
                "invalid pattern '{}': {e}",
                self.pattern
            )))?;
        let matcher = builder
            .build()
            .map_err(MarginaliaError::source_unavailable)?;

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(MarginaliaError::source_unavailable(e)),
        };

        let mut matches: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .filter(|path| matcher.matched(path, false).is_ignore())
            .collect();
        matches.sort();

        matches.into_iter().next().ok_or_else(not_found)
    }
}
