//! SQLite-backed register.
//!
//! # Invariants
//! - One row per key in `kv_entries`; values are stored as JSON text.
//! - Constructed only over connections with migrations applied.

use super::{KeyValueRegister, KvError, KvResult};
use crate::db::migrations::{current_user_version, latest_version};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

const KV_TABLE: &str = "kv_entries";

/// Register persisted in a SQLite database opened by `open_db`.
pub struct SqliteRegister<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRegister<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` differs from the latest migration.
    /// - `MissingRequiredTable` when `kv_entries` is absent.
    pub fn try_new(conn: &'conn Connection) -> KvResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(KvError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_table: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [KV_TABLE],
            |row| row.get(0),
        )?;
        if !has_table {
            return Err(KvError::MissingRequiredTable(KV_TABLE));
        }

        Ok(Self { conn })
    }
}

impl KeyValueRegister for SqliteRegister<'_> {
    fn get(&self, key: &str) -> KvResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => serde_json::from_str(&text).map(Some).map_err(|err| {
                KvError::InvalidData(format!("value under `{key}` is not valid JSON: {err}"))
            }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> KvResult<()> {
        let text = serde_json::to_string(value).map_err(KvError::Serialize)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, text],
        )?;
        Ok(())
    }
}
