//! Markdown Artifact Writer
//!
//! Implements the ArtifactWriter port: one `<slug>.md` per book under
//! `<vault>/<subdir>`, rendered from the compiled-in `templates/book.md` or
//! from a user template configured as `[vault] template`.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use minijinja::{context, Environment};
use tracing::debug;

use crate::domain::ports::{ArtifactWriter, WriteOutcome};
use crate::domain::value_objects::BookKey;
use crate::error::{MarginaliaError, MarginaliaResult};
use crate::infrastructure::fs::{hash_bytes, hash_file, write_atomic};

/// Default artifact directory inside the vault
pub const DEFAULT_SUBDIR: &str = "apple_books_sync";

#[derive(Template)]
#[template(path = "book.md", escape = "none")]
struct BookTemplate<'a> {
    title: &'a str,
    author: &'a str,
    quotes: Vec<String>,
}

/// Render a highlight as a Markdown block quote, one `>` per line
fn block_quote(text: &str) -> String {
    text.trim_end()
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full artifact content for one book
pub fn render_book(title: &str, author: &str, highlights: &[String]) -> MarginaliaResult<String> {
    let template = BookTemplate {
        title,
        author,
        quotes: highlights.iter().map(|h| block_quote(h)).collect(),
    };
    let rendered = template.render()?;
    Ok(format!("{}\n", rendered.trim_end()))
}

/// Layout used for book artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArtifactTemplate {
    #[default]
    Builtin,
    /// A Jinja-style template read from disk.
    ///
    /// Sees `title`, `author`, `highlights` (raw texts) and `quotes` (texts
    /// already formatted as block quotes).
    Custom { path: PathBuf, source: String },
}

impl ArtifactTemplate {
    /// Read a user template and reject it early if it does not parse
    pub fn load(path: &Path) -> MarginaliaResult<Self> {
        let invalid = |message: String| MarginaliaError::Config {
            file: path.to_path_buf(),
            message,
        };
        let source =
            fs::read_to_string(path).map_err(|e| invalid(format!("cannot read template: {e}")))?;

        let env = Environment::new();
        env.template_from_str(&source)
            .map_err(|e| invalid(format!("invalid template: {e}")))?;

        Ok(Self::Custom {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full artifact content for one book
    pub fn render(&self, title: &str, author: &str, highlights: &[String]) -> MarginaliaResult<String> {
        match self {
            Self::Builtin => render_book(title, author, highlights),
            Self::Custom { source, .. } => {
                let quotes: Vec<String> = highlights.iter().map(|h| block_quote(h)).collect();
                let rendered = Environment::new().render_str(
                    source,
                    context! {
                        title => title,
                        author => author,
                        highlights => highlights,
                        quotes => quotes,
                    },
                )?;
                Ok(format!("{}\n", rendered.trim_end()))
            }
        }
    }
}

/// Writes book artifacts into a directory, skipping byte-identical rewrites
#[derive(Debug, Clone)]
pub struct MarkdownArtifactWriter {
    dir: PathBuf,
    template: ArtifactTemplate,
}

impl MarkdownArtifactWriter {
    /// Writer for `<vault>/<subdir>` using the built-in layout
    pub fn new(vault: &Path, subdir: &str) -> Self {
        Self {
            dir: vault.join(subdir),
            template: ArtifactTemplate::Builtin,
        }
    }

    pub fn with_template(mut self, template: ArtifactTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the artifact for `title` lives
    pub fn artifact_path(&self, title: &str) -> PathBuf {
        self.dir.join(BookKey::from_title(title).file_name())
    }
}

impl ArtifactWriter for MarkdownArtifactWriter {
    fn write(
        &self,
        title: &str,
        author: &str,
        highlights: &[String],
    ) -> MarginaliaResult<WriteOutcome> {
        let path = self.artifact_path(title);
        let content = self
            .template
            .render(title, author, highlights)
            .map_err(|e| MarginaliaError::write_error(title, e))?;

        let existing = hash_file(&path).map_err(|e| MarginaliaError::write_error(title, e))?;
        if existing.as_deref() == Some(hash_bytes(content.as_bytes()).as_str()) {
            debug!(path = %path.display(), "artifact unchanged");
            return Ok(WriteOutcome::Unchanged(path));
        }

        write_atomic(&path, content.as_bytes()).map_err(|e| MarginaliaError::write_error(title, e))?;
        debug!(path = %path.display(), highlights = highlights.len(), "artifact written");
        Ok(WriteOutcome::Written(path))
    }
}
