//! Persistence adapter between the item store and a key-value register.
//!
//! # Responsibility
//! - Serialize the full item sequence into one register slot.
//! - Decode stored records leniently so one bad record never blocks a load.
//!
//! # Invariants
//! - Every save rewrites the whole sequence; there are no partial writes.
//! - `load` never fails the caller.

pub mod todo_repo;
