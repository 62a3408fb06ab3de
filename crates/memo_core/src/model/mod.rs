//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the canonical item record shared by store, persistence and FFI.
//!
//! # Invariants
//! - Every item is identified by a stable `TodoId`, never by position.
//! - Categories are free-form labels compared case-sensitively.

pub mod todo;
