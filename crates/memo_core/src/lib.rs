//! Core logic for the memo to-do app.
//! Owns the item list, its persistence round-trip and category grouping.

pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StorageConfig;
pub use kv::{InMemoryRegister, KeyValueRegister, KvError, KvResult, SqliteRegister};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{TodoId, TodoItem};
pub use repo::todo_repo::{
    decode_todos, encode_todos, DecodeOutcome, RegisterTodoRepository, RepoError, RepoResult,
    TodoRepository, TODOS_KEY,
};
pub use service::todo_store::{
    CategoryGroup, GroupOrder, PersistFailure, StoreError, StoreResult, TodoStore,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
