//! In-memory item store for the to-do screen.
//!
//! # Responsibility
//! - Own the ordered item sequence for the lifetime of a session.
//! - Flush the full sequence through the repository after every mutation.
//! - Derive category groups on demand.
//!
//! # Invariants
//! - Insertion order is preserved; deletion shifts later items down by one.
//! - In-memory state is authoritative; a failed save never rolls it back.
//! - Positional operations are valid only for `index < len()` and panic otherwise.

use crate::model::todo::{TodoId, TodoItem};
use crate::repo::todo_repo::{RepoError, TodoRepository};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for id-addressed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    NotFound(TodoId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Ordering applied to category groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupOrder {
    /// Groups appear in the order their category is first seen in the list.
    #[default]
    FirstSeen,
    /// Groups sorted by category label; the uncategorized group comes first.
    Lexicographic,
}

/// One derived category group. Items keep their list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: Option<&'a str>,
    pub items: Vec<&'a TodoItem>,
}

/// Save failure recorded after a mutation.
#[derive(Debug)]
pub struct PersistFailure {
    pub operation: &'static str,
    pub error: RepoError,
}

/// Item store backed by an injected repository.
pub struct TodoStore<R: TodoRepository> {
    repo: R,
    items: Vec<TodoItem>,
    last_persist_error: Option<PersistFailure>,
}

impl<R: TodoRepository> TodoStore<R> {
    /// Builds the store from the repository's stored sequence.
    pub fn open(repo: R) -> Self {
        let items = repo.load();
        info!(
            "event=store_open module=store status=ok count={}",
            items.len()
        );
        Self {
            repo,
            items,
            last_persist_error: None,
        }
    }

    /// Appends an open, uncategorized item and returns its id.
    pub fn create(&mut self, text: impl Into<String>) -> TodoId {
        self.push(TodoItem::new(text))
    }

    /// Appends an open item in `category` and returns its id.
    pub fn create_in_category(
        &mut self,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> TodoId {
        self.push(TodoItem::with_category(text, category))
    }

    pub fn set_completed(&mut self, id: TodoId, value: bool) -> StoreResult<()> {
        let index = self.require(id)?;
        self.set_completed_at(index, value);
        Ok(())
    }

    /// Flips completion state and returns the new value.
    pub fn toggle_completed(&mut self, id: TodoId) -> StoreResult<bool> {
        let index = self.require(id)?;
        let value = self.items[index].toggle();
        self.persist("toggle_completed");
        Ok(value)
    }

    pub fn edit_text(&mut self, id: TodoId, text: impl Into<String>) -> StoreResult<()> {
        let index = self.require(id)?;
        self.edit_text_at(index, text);
        Ok(())
    }

    pub fn set_category(&mut self, id: TodoId, category: Option<String>) -> StoreResult<()> {
        let index = self.require(id)?;
        self.items[index].category = category;
        self.persist("set_category");
        Ok(())
    }

    /// Removes the item with `id` and returns it.
    pub fn delete(&mut self, id: TodoId) -> StoreResult<TodoItem> {
        let index = self.require(id)?;
        Ok(self.delete_at(index))
    }

    /// Sets completion on the item at `index`.
    ///
    /// # Panics
    /// Panics when `index >= len()`. Indices go stale after any create/delete.
    pub fn set_completed_at(&mut self, index: usize, value: bool) {
        self.check_index(index, "set_completed");
        self.items[index].is_completed = value;
        self.persist("set_completed");
    }

    /// Replaces text on the item at `index`.
    ///
    /// # Panics
    /// Panics when `index >= len()`.
    pub fn edit_text_at(&mut self, index: usize, text: impl Into<String>) {
        self.check_index(index, "edit_text");
        self.items[index].text = text.into();
        self.persist("edit_text");
    }

    /// Removes the item at `index`, shifting later items down by one.
    ///
    /// # Panics
    /// Panics when `index >= len()`.
    pub fn delete_at(&mut self, index: usize) -> TodoItem {
        self.check_index(index, "delete");
        let removed = self.items.remove(index);
        self.persist("delete");
        removed
    }

    /// Current items in order.
    pub fn list(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Maps an id to its current position for presentation.
    pub fn position_of(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Partitions items by category.
    ///
    /// Every item lands in exactly one group. Category equality is
    /// case-sensitive; items without a category share the `None` group.
    pub fn groups_by_category(&self, order: GroupOrder) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
        for item in &self.items {
            let category = item.category();
            match groups.iter_mut().find(|group| group.category == category) {
                Some(group) => group.items.push(item),
                None => groups.push(CategoryGroup {
                    category,
                    items: vec![item],
                }),
            }
        }

        if order == GroupOrder::Lexicographic {
            // Option orders None first, then by string.
            groups.sort_by(|left, right| left.category.cmp(&right.category));
        }
        groups
    }

    /// Save failure from the most recent mutation, if it failed.
    pub fn last_persist_error(&self) -> Option<&PersistFailure> {
        self.last_persist_error.as_ref()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Consumes the store and returns the items and repository.
    pub fn into_parts(self) -> (Vec<TodoItem>, R) {
        (self.items, self.repo)
    }

    fn push(&mut self, item: TodoItem) -> TodoId {
        let id = item.id;
        self.items.push(item);
        self.persist("create");
        id
    }

    fn require(&self, id: TodoId) -> StoreResult<usize> {
        self.position_of(id).ok_or(StoreError::NotFound(id))
    }

    fn check_index(&self, index: usize, operation: &'static str) {
        let len = self.items.len();
        assert!(
            index < len,
            "todo {operation}: index {index} out of bounds for length {len}"
        );
    }

    fn persist(&mut self, operation: &'static str) {
        match self.repo.save(&self.items) {
            Ok(()) => {
                debug!(
                    "event=todo_{operation} module=store status=ok count={}",
                    self.items.len()
                );
                self.last_persist_error = None;
            }
            Err(err) => {
                error!(
                    "event=todo_{operation} module=store status=error error_code=persist_failed count={} error={err}",
                    self.items.len()
                );
                self.last_persist_error = Some(PersistFailure {
                    operation,
                    error: err,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupOrder, TodoStore};
    use crate::kv::InMemoryRegister;
    use crate::repo::todo_repo::RegisterTodoRepository;

    fn empty_store() -> TodoStore<RegisterTodoRepository<InMemoryRegister>> {
        TodoStore::open(RegisterTodoRepository::new(InMemoryRegister::new()))
    }

    #[test]
    fn toggle_returns_new_state() {
        let mut store = empty_store();
        let id = store.create("walk");
        assert_eq!(store.toggle_completed(id), Ok(true));
        assert_eq!(store.toggle_completed(id), Ok(false));
    }

    #[test]
    fn lexicographic_groups_put_uncategorized_first() {
        let mut store = empty_store();
        store.create_in_category("b", "work");
        store.create("loose");
        store.create_in_category("a", "home");

        let labels: Vec<_> = store
            .groups_by_category(GroupOrder::Lexicographic)
            .into_iter()
            .map(|group| group.category)
            .collect();
        assert_eq!(labels, vec![None, Some("home"), Some("work")]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn edit_text_at_out_of_range_panics() {
        let mut store = empty_store();
        store.edit_text_at(0, "nothing here");
    }
}
