//! Flat key-value register abstraction.
//!
//! # Responsibility
//! - Define the single get/set-by-key primitive the persistence adapter needs.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - `set` unconditionally replaces the previous value (last write wins).
//! - No listing, deletion-by-pattern or transactions are exposed.

use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::InMemoryRegister;
pub use sqlite::SqliteRegister;

pub type KvResult<T> = Result<T, KvError>;

/// Register-level error for storage transport and stored-value decoding.
#[derive(Debug)]
pub enum KvError {
    Sqlite(rusqlite::Error),
    /// Database was written by a newer build than this one.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Serialize(serde_json::Error),
    /// Stored bytes exist but are not a readable value.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "register schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Serialize(err) => write!(f, "failed to serialize register value: {err}"),
            Self::InvalidData(message) => write!(f, "invalid register value: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "register connection is not migrated: expected schema version {expected_version}, found {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "register connection is missing table `{table}`")
            }
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Single-slot-per-key value store.
pub trait KeyValueRegister {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> KvResult<Option<Value>>;
    /// Overwrites the value stored under `key`.
    fn set(&self, key: &str, value: &Value) -> KvResult<()>;
}

impl<T: KeyValueRegister + ?Sized> KeyValueRegister for &T {
    fn get(&self, key: &str) -> KvResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value) -> KvResult<()> {
        (**self).set(key, value)
    }
}
