//! Flutter-facing bridge for `memo_core`.

pub mod api;
