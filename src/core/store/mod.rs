//! SQLite-backed store for projects, worktrees and cached issues
//!
//! The store owns a single connection and nothing else. Every operation is
//! one auto-committed statement, so each call is its own atomic unit; callers
//! that need several writes to succeed together must compose that themselves.
//!
//! Tables:
//! - `projects`     - tracked repositories, with an opaque JSON config blob
//! - `worktrees`    - git worktrees checked out for an issue
//! - `issue_cache`  - issue metadata keyed by (project, issue number)

mod issues;
mod projects;
mod schema;
mod types;
mod worktrees;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Connection;
use thiserror::Error;

/// Reserved path that selects a transient in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// Directory under the user's home that holds the database and config
pub const DATA_DIR: &str = ".issue-flow";

/// Database file name within [`DATA_DIR`]
const DATABASE_FILE: &str = "database.db";

/// Status a worktree gets when none is given
pub const DEFAULT_WORKTREE_STATUS: &str = "active";

/// Errors returned by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("store is closed")]
    Closed,

    #[error("failed to get home directory")]
    HomeDir,

    #[error("failed to create database directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open database {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to initialize schema")]
    Schema(#[source] rusqlite::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// True when a lookup or update matched no row
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// True when the engine rejected a write on a primary key, unique or
    /// not-null constraint
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Handle to an open store
///
/// Construction runs the schema initializer; a handle is never returned for a
/// database whose schema could not be created. After [`Store::close`] every
/// operation fails with [`StoreError::Closed`].
pub struct Store {
    conn: Option<Connection>,
    path: PathBuf,
}

impl Store {
    /// Open the per-user database at `~/.issue-flow/database.db`
    pub fn open_default() -> StoreResult<Self> {
        let path = Self::default_path()?;
        Self::open(path)
    }

    /// Resolve the per-user database path without opening it
    pub fn default_path() -> StoreResult<PathBuf> {
        let dirs = directories::BaseDirs::new().ok_or(StoreError::HomeDir)?;
        Ok(dirs.home_dir().join(DATA_DIR).join(DATABASE_FILE))
    }

    /// Open (or create) a database file
    ///
    /// The sentinel path `":memory:"` opens a transient in-memory store
    /// instead. Missing parent directories are created.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.as_os_str() == MEMORY_PATH {
            return Self::open_in_memory();
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::with_connection(conn, path.to_path_buf())
    }

    /// Open a transient in-memory store (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;

        Self::with_connection(conn, PathBuf::from(MEMORY_PATH))
    }

    fn with_connection(conn: Connection, path: PathBuf) -> StoreResult<Self> {
        if let Err(err) = schema::configure(&conn).and_then(|()| schema::init_schema(&conn)) {
            // Release the connection before reporting
            let _ = conn.close();
            return Err(StoreError::Schema(err));
        }

        tracing::debug!(path = %path.display(), "opened store");

        Ok(Self {
            conn: Some(conn),
            path,
        })
    }

    /// Path this store was opened with (`":memory:"` for transient stores)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when backed by an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }

    /// True until [`Store::close`] succeeds
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Release the underlying connection
    ///
    /// Closing an already closed store is a no-op.
    pub fn close(&mut self) -> StoreResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "closed store");
                Ok(())
            }
            Err((conn, err)) => {
                self.conn = Some(conn);
                Err(StoreError::Sqlite(err))
            }
        }
    }

    pub(crate) fn conn(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }
}

/// Parse a timestamp column
///
/// Accepts the engine's `YYYY-MM-DD HH:MM:SS[.fff]` text and RFC 3339.
pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
