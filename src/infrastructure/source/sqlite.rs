//! SQLite Highlight Source
//!
//! Implements the HighlightSource port over the Apple Books databases: the
//! library database is opened read-only and the annotation database is
//! attached to it under a configurable alias.

use std::path::PathBuf;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, warn};

use crate::domain::entities::HighlightRecord;
use crate::domain::ports::HighlightSource;
use crate::domain::value_objects::Watermark;
use crate::error::{MarginaliaError, MarginaliaResult};

use super::locate::DbLocation;
use super::staging::DbStager;

/// Annotation table inside the attached database
pub const ANNOTATION_TABLE: &str = "ZAEANNOTATION";

/// Book metadata table inside the library database
pub const LIBRARY_TABLE: &str = "ZBKLIBRARYASSET";

/// Alias used when none is configured
pub const DEFAULT_ATTACH_ALIAS: &str = "annotations";

/// Whether `alias` can be spliced into SQL as a schema name
pub fn is_valid_alias(alias: &str) -> bool {
    let mut chars = alias.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !alias.eq_ignore_ascii_case("main")
        && !alias.eq_ignore_ascii_case("temp")
}

/// Highlight source backed by the Apple Books SQLite databases
#[derive(Debug, Clone)]
pub struct SqliteHighlightSource {
    annotation: DbLocation,
    library: DbLocation,
    alias: String,
    stager: Option<DbStager>,
}

impl SqliteHighlightSource {
    /// Fails if `alias` is not a plain identifier
    pub fn new(
        annotation: DbLocation,
        library: DbLocation,
        alias: impl Into<String>,
    ) -> MarginaliaResult<Self> {
        let alias = alias.into();
        if !is_valid_alias(&alias) {
            return Err(MarginaliaError::source_unavailable(format!(
                "invalid attach alias '{alias}'"
            )));
        }
        Ok(Self {
            annotation,
            library,
            alias,
            stager: None,
        })
    }

    /// Query staged copies instead of the live files
    pub fn with_staging(mut self, stager: DbStager) -> Self {
        self.stager = Some(stager);
        self
    }

    /// The live annotation database (the file worth watching)
    pub fn annotation_path(&self) -> MarginaliaResult<PathBuf> {
        self.annotation.resolve()
    }

    /// The live library database
    pub fn library_path(&self) -> MarginaliaResult<PathBuf> {
        self.library.resolve()
    }

    fn staged(&self, live: PathBuf) -> MarginaliaResult<PathBuf> {
        match &self.stager {
            Some(stager) => stager.stage(&live),
            None => Ok(live),
        }
    }

    /// Open a fresh connection with the annotation database attached
    fn connect(&self) -> MarginaliaResult<Connection> {
        let library = self.staged(self.library.resolve()?)?;
        let annotation = self.staged(self.annotation.resolve()?)?;
        debug!(
            library = %library.display(),
            annotation = %annotation.display(),
            "opening highlight source"
        );

        let conn = Connection::open_with_flags(
            &library,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let has_books = conn
            .query_row(&format!("SELECT 1 FROM [{LIBRARY_TABLE}] LIMIT 1"), [], |_| Ok(()))
            .optional()?;
        if has_books.is_none() {
            warn!(table = LIBRARY_TABLE, "library table is empty, no highlights will match");
        }

        conn.execute(
            &format!("ATTACH DATABASE ?1 AS [{}]", self.alias),
            params![annotation.to_string_lossy()],
        )?;

        let table: Option<String> = conn
            .query_row(
                &format!(
                    "SELECT name FROM [{}].sqlite_master WHERE type = 'table' AND name = ?1",
                    self.alias
                ),
                params![ANNOTATION_TABLE],
                |row| row.get(0),
            )
            .optional()?;
        if table.is_none() {
            return Err(MarginaliaError::source_unavailable(format!(
                "table {ANNOTATION_TABLE} not found in {}",
                annotation.display()
            )));
        }

        Ok(conn)
    }

    fn query_after(&self, after: i64) -> MarginaliaResult<Vec<HighlightRecord>> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT a.Z_PK,
                    COALESCE(b.ZTITLE, 'Unknown Title'),
                    COALESCE(b.ZAUTHOR, 'Unknown Author'),
                    a.ZANNOTATIONSELECTEDTEXT
             FROM [{alias}].[{ANNOTATION_TABLE}] a
             JOIN [{LIBRARY_TABLE}] b ON a.ZANNOTATIONASSETID = b.ZASSETID
             WHERE a.ZANNOTATIONDELETED = 0
               AND a.ZANNOTATIONSELECTEDTEXT IS NOT NULL
               AND a.ZANNOTATIONSELECTEDTEXT <> ''
               AND a.Z_PK > ?1
             ORDER BY a.Z_PK ASC",
            alias = self.alias,
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![after], |row| {
            Ok(HighlightRecord {
                position: row.get(0)?,
                book_title: row.get(1)?,
                book_author: row.get(2)?,
                text: row.get(3)?,
            })
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(after, count = records.len(), "fetched highlights");
        Ok(records)
    }
}

impl HighlightSource for SqliteHighlightSource {
    fn fetch_since(&self, after: Watermark) -> MarginaliaResult<Vec<HighlightRecord>> {
        self.query_after(after.position())
    }

    fn fetch_all(&self) -> MarginaliaResult<Vec<HighlightRecord>> {
        self.query_after(i64::MIN)
    }
}
