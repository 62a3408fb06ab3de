//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory session state and orchestrate persistence after mutations.
//! - Keep FFI and presentation layers decoupled from register details.

pub mod todo_store;
