//! ArtifactWriter port - the durable sink for grouped highlights

use std::path::PathBuf;

use crate::error::MarginaliaResult;

/// What a successful write did on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Artifact created or replaced
    Written(PathBuf),
    /// Artifact already had exactly this content
    Unchanged(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &PathBuf {
        match self {
            WriteOutcome::Written(path) | WriteOutcome::Unchanged(path) => path,
        }
    }
}

/// Produces one artifact per book.
///
/// Full-overwrite semantics: the artifact reflects exactly the given
/// highlights, never an append. Calling twice with identical input must yield
/// identical bytes. Failures surface as `MarginaliaError::WriteError` naming
/// the book and must not touch other books' artifacts.
pub trait ArtifactWriter {
    fn write(&self, title: &str, author: &str, highlights: &[String])
        -> MarginaliaResult<WriteOutcome>;
}

impl<T: ArtifactWriter + ?Sized> ArtifactWriter for &T {
    fn write(
        &self,
        title: &str,
        author: &str,
        highlights: &[String],
    ) -> MarginaliaResult<WriteOutcome> {
        (**self).write(title, author, highlights)
    }
}
