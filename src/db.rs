//! SQLite connection target and per-call sessions

use crate::error::{Result, StoreError};
use crate::schema::RecordShape;
use crate::types::EntityType;
use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};

/// Where the store lives. Holds no open connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Open a target from a connection string.
    ///
    /// Accepts `sqlite:///abs/path.db`, `sqlite://rel/path.db` or a bare path.
    /// In-memory URLs are rejected: each session opens a fresh connection, so
    /// an in-memory database would always read back empty.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim();
        let path = match url.strip_prefix("sqlite:") {
            Some(rest) => rest.strip_prefix("//").unwrap_or(rest),
            None if url.contains("://") => {
                return Err(StoreError::ConfigError(format!(
                    "Unsupported database URL: {}",
                    url
                )))
            }
            None => url,
        };

        if path.is_empty() || path == ":memory:" {
            return Err(StoreError::ConfigError(format!(
                "Database URL must name a file: {}",
                url
            )));
        }

        Ok(Self::from_path(path))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a read-only session. Fails if the database file does not exist.
    pub fn session(&self) -> Result<Session> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            StoreError::DatabaseError(format!(
                "Failed to open database {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Session { conn })
    }

    /// Create any of the record tables that are missing
    pub fn create_tables(&self) -> Result<()> {
        let conn = Connection::open(&self.path).map_err(|e| {
            StoreError::DatabaseError(format!(
                "Failed to open database {}: {}",
                self.path.display(),
                e
            ))
        })?;

        for entity in EntityType::ALL {
            let shape = RecordShape::for_entity(entity);
            conn.execute(&shape.create_table_sql(), []).map_err(|e| {
                StoreError::DatabaseError(format!(
                    "Failed to create {} table: {}",
                    shape.table, e
                ))
            })?;
        }

        Ok(())
    }
}

/// A connection held for the duration of one call
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Begin the read transaction a query runs in. Rolled back on drop.
    pub fn read_transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(|e| StoreError::DatabaseError(format!("Failed to begin transaction: {}", e)))
    }

    /// Number of rows stored for `shape`
    pub fn row_count(&self, shape: &RecordShape) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", shape.table), [], |row| row.get(0))
            .map_err(|e| {
                StoreError::DatabaseError(format!("Failed to count {}: {}", shape.table, e))
            })?;
        Ok(count as usize)
    }
}
