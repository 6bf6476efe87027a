//! Persistence boundary for the planner state.
//!
//! The whole state is stored as one JSON document in a key-value slot under
//! a fixed storage key. Nothing stored yet means three empty collections.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StorageError};
use crate::store::PlannerState;

pub const DEFAULT_STORAGE_KEY: &str = "study-planner-storage";

/// Where the store loads its initial state from and saves changes to.
pub trait StateBackend {
    /// # Errors
    /// Returns an error if stored state exists but cannot be read.
    fn load(&self) -> Result<PlannerState>;

    /// # Errors
    /// Returns an error if the state cannot be written.
    fn save(&self, state: &PlannerState) -> Result<()>;
}

/// SQLite key-value slot.
pub struct SqliteBackend {
    conn: Connection,
    key: String,
}

impl SqliteBackend {
    /// Open or create the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path, key: impl Into<String>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn, key)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if SQLite cannot create the schema.
    pub fn open_memory(key: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        Self::from_connection(conn, key)
    }

    fn from_connection(conn: Connection, key: impl Into<String>) -> Result<Self> {
        let backend = Self {
            conn,
            key: key.into(),
        };
        backend.migrate()?;
        Ok(backend)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl StateBackend for SqliteBackend {
    fn load(&self) -> Result<PlannerState> {
        let Some(raw) = self.kv_get(&self.key)? else {
            return Ok(PlannerState::default());
        };
        let state = serde_json::from_str(&raw).map_err(|e| StorageError::CorruptState {
            key: self.key.clone(),
            message: e.to_string(),
        })?;
        Ok(state)
    }

    fn save(&self, state: &PlannerState) -> Result<()> {
        let raw = serde_json::to_string(state)?;
        self.kv_set(&self.key, &raw)?;
        Ok(())
    }
}

/// Keeps the last saved state in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Rc<RefCell<Option<PlannerState>>>,
}

impl MemoryBackend {
    pub fn with_state(state: PlannerState) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(state))),
        }
    }

    /// The most recently saved state, if any.
    pub fn saved(&self) -> Option<PlannerState> {
        self.slot.borrow().clone()
    }
}

impl StateBackend for MemoryBackend {
    fn load(&self) -> Result<PlannerState> {
        Ok(self.slot.borrow().clone().unwrap_or_default())
    }

    fn save(&self, state: &PlannerState) -> Result<()> {
        *self.slot.borrow_mut() = Some(state.clone());
        Ok(())
    }
}
