//! To-do item model.
//!
//! # Responsibility
//! - Define the record persisted under the todos register key.
//! - Provide completion helpers used by store mutations.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `text` and `category` are never validated; empty strings are valid.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one to-do item.
pub type TodoId = Uuid;

/// One to-do entry.
///
/// Wire names follow the stored field-map layout (`text`, `isCompleted`,
/// `category`), with `id` added for stable addressing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
    /// Grouping label. `None` for items written without a category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TodoItem {
    /// Creates an open, uncategorized item with a generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates an open item in `category` with a generated id.
    pub fn with_category(text: impl Into<String>, category: impl Into<String>) -> Self {
        let mut item = Self::new(text);
        item.category = Some(category.into());
        item
    }

    /// Creates an open item with a caller-provided id.
    ///
    /// Used by decode paths where identity already exists in storage.
    pub fn with_id(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_completed: false,
            category: None,
        }
    }

    pub fn complete(&mut self) {
        self.is_completed = true;
    }

    pub fn reopen(&mut self) {
        self.is_completed = false;
    }

    /// Flips completion state and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.is_completed = !self.is_completed;
        self.is_completed
    }

    /// Returns the category label, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}
