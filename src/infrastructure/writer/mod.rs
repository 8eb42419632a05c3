//! Artifact writer implementations

mod markdown;

pub use markdown::{render_book, ArtifactTemplate, MarkdownArtifactWriter, DEFAULT_SUBDIR};
