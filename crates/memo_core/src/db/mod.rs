//! SQLite bootstrap for `SqliteRegister`.
//!
//! Failures surface as `KvError`, the register's error type, since the
//! register is the only consumer of these connections.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Entries are not read or written before migrations succeed.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
