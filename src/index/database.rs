//! SQLite-backed checksum index.
//!
//! The store is a single-run artifact: [`SqliteIndex::create`] deletes any
//! existing file at the target path before creating the table, so nothing
//! leaks from one invocation into the next.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::{DuplicateIndex, FileRecord, IndexError, IndexResult, KnownCopy};
use crate::scanner::Checksum;

/// Default store location, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "./copycure.db";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS files (
    checksum TEXT PRIMARY KEY,
    path TEXT NOT NULL
);";

/// Durable index using SQLite.
pub struct SqliteIndex {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteIndex")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteIndex {
    /// Create a fresh store at `path`, removing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the old file cannot be removed or the new store
    /// cannot be opened or initialized.
    pub fn create(path: &Path) -> IndexResult<Self> {
        match fs::remove_file(path) {
            Ok(()) => log::debug!("Removed previous index store {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(IndexError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }

        let conn = Connection::open(path)?;
        let index = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        index.init_schema()?;
        log::debug!("Index store created at {}", path.display());
        Ok(index)
    }

    /// Create a store that lives only in memory (used by tests).
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot be initialized.
    pub fn open_in_memory() -> IndexResult<Self> {
        let index = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        index.init_schema()?;
        Ok(index)
    }

    fn init_schema(&self) -> IndexResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Location of the store file, `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl DuplicateIndex for SqliteIndex {
    fn lookup(&mut self, checksum: &Checksum) -> IndexResult<Option<KnownCopy>> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT path FROM files WHERE checksum = ?1",
                params![checksum.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.map(|p| KnownCopy::Recorded(PathBuf::from(p))))
    }

    fn insert(&mut self, checksum: &Checksum, path: &Path) -> IndexResult<()> {
        let result = self.conn.execute(
            "INSERT INTO files (checksum, path) VALUES (?1, ?2)",
            params![checksum.as_str(), path.to_string_lossy().into_owned()],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(IndexError::AlreadyIndexed {
                    checksum: checksum.to_string(),
                    path: path.to_path_buf(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn records(&self) -> IndexResult<Vec<FileRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT checksum, path FROM files ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (checksum, path) = row?;
            match Checksum::from_hex(&checksum) {
                Some(checksum) => records.push(FileRecord::new(checksum, path)),
                None => log::warn!("Skipping malformed checksum in index: {}", checksum),
            }
        }
        Ok(records)
    }

    fn len(&self) -> IndexResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn name(&self) -> &'static str {
        "sql"
    }
}
