//! SQLite fixtures shaped like the Apple Books databases.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

/// Where Apple Books keeps its databases, relative to the home directory
pub const DOCUMENTS_DIR: &str = "Library/Containers/com.apple.iBooksX/Data/Documents";

pub const ANNOTATION_DB: &str = "AEAnnotation_v10312011_1727_local.sqlite";
pub const LIBRARY_DB: &str = "BKLibrary-1-091020131601.sqlite";

/// Annotation and library databases under a documents directory
pub struct BooksDb {
    annotation: PathBuf,
    library: PathBuf,
}

impl BooksDb {
    /// Create both databases with empty tables
    pub fn create(documents: &Path) -> Self {
        let annotation_dir = documents.join("AEAnnotation");
        let library_dir = documents.join("BKLibrary");
        fs::create_dir_all(&annotation_dir).unwrap();
        fs::create_dir_all(&library_dir).unwrap();

        let library = library_dir.join(LIBRARY_DB);
        Connection::open(&library)
            .unwrap()
            .execute_batch(
                "CREATE TABLE ZBKLIBRARYASSET (
                     Z_PK INTEGER PRIMARY KEY,
                     ZASSETID TEXT,
                     ZTITLE TEXT,
                     ZAUTHOR TEXT
                 );",
            )
            .unwrap();

        let annotation = annotation_dir.join(ANNOTATION_DB);
        Connection::open(&annotation)
            .unwrap()
            .execute_batch(
                "CREATE TABLE ZAEANNOTATION (
                     Z_PK INTEGER PRIMARY KEY,
                     ZANNOTATIONASSETID TEXT,
                     ZANNOTATIONSELECTEDTEXT TEXT,
                     ZANNOTATIONDELETED INTEGER
                 );",
            )
            .unwrap();

        Self {
            annotation,
            library,
        }
    }

    pub fn annotation_path(&self) -> &Path {
        &self.annotation
    }

    pub fn library_path(&self) -> &Path {
        &self.library
    }

    pub fn add_book(&self, asset_id: &str, title: &str, author: &str) {
        Connection::open(&self.library)
            .unwrap()
            .execute(
                "INSERT INTO ZBKLIBRARYASSET (ZASSETID, ZTITLE, ZAUTHOR) VALUES (?1, ?2, ?3)",
                params![asset_id, title, author],
            )
            .unwrap();
    }

    pub fn highlight(&self, pk: i64, asset_id: &str, text: &str) {
        Connection::open(&self.annotation)
            .unwrap()
            .execute(
                "INSERT INTO ZAEANNOTATION VALUES (?1, ?2, ?3, 0)",
                params![pk, asset_id, text],
            )
            .unwrap();
    }

    pub fn delete_highlight(&self, pk: i64) {
        Connection::open(&self.annotation)
            .unwrap()
            .execute(
                "UPDATE ZAEANNOTATION SET ZANNOTATIONDELETED = 1 WHERE Z_PK = ?1",
                params![pk],
            )
            .unwrap();
    }
}
