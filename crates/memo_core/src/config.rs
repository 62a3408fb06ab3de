//! Storage configuration resolved from the environment.
//!
//! # Invariants
//! - Empty or whitespace-only variables are treated as unset.

use crate::repo::todo_repo::TODOS_KEY;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "MEMO_DB_PATH";
pub const TODOS_KEY_ENV: &str = "MEMO_TODOS_KEY";
const DEFAULT_DB_FILE_NAME: &str = "memo_todos.sqlite3";

/// Where the register database lives and which key holds the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            key: TODOS_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolves `MEMO_DB_PATH` and `MEMO_TODOS_KEY`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_empty(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            key: non_empty(TODOS_KEY_ENV).unwrap_or(defaults.key),
        }
    }
}
