//! FFI use-case API for the to-do screen.
//!
//! # Responsibility
//! - Expose id-addressed todo operations to Dart via FRB.
//! - Translate core errors into simple response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Positional (index-based) store operations are not exported.
//! - Each call opens the register, applies one operation and persists it
//!   while holding a process-wide lock. The register, not a long-lived
//!   store, carries state between calls.

use log::warn;
use memo_core::db::open_db;
use memo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    GroupOrder, RegisterTodoRepository, SqliteRegister, StorageConfig, TodoId, TodoItem,
    TodoStore,
};
use std::sync::{Mutex, OnceLock, PoisonError};
use uuid::Uuid;

static STORAGE_CONFIG: OnceLock<StorageConfig> = OnceLock::new();
// Serializes load-modify-save cycles; the register has no transactions.
static STORE_LOCK: Mutex<()> = Mutex::new(());

type SqliteTodoStore<'conn> = TodoStore<RegisterTodoRepository<SqliteRegister<'conn>>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One todo row for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntry {
    /// Stable todo ID in string form.
    pub todo_id: String,
    pub text: String,
    pub is_completed: bool,
    pub category: Option<String>,
}

/// One category section for grouped rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoGroupEntry {
    /// `None` for items without a category.
    pub category: Option<String>,
    pub items: Vec<TodoEntry>,
}

/// Flat list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub ok: bool,
    pub items: Vec<TodoEntry>,
    pub message: String,
}

/// Grouped list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoGroupsResponse {
    pub ok: bool,
    pub groups: Vec<TodoGroupEntry>,
    pub message: String,
}

/// Mutation response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    pub ok: bool,
    /// Affected todo ID, when the operation targeted one.
    pub todo_id: Option<String>,
    pub message: String,
}

impl TodoActionResponse {
    fn success(message: impl Into<String>, todo_id: TodoId) -> Self {
        Self {
            ok: true,
            todo_id: Some(todo_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            todo_id: None,
            message: message.into(),
        }
    }
}

/// Lists todos in stored order.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_list() -> TodoListResponse {
    match with_store(|store| Ok(store.list().iter().map(to_entry).collect::<Vec<_>>())) {
        Ok(items) => TodoListResponse {
            ok: true,
            message: format!("{} todo(s).", items.len()),
            items,
        },
        Err(err) => TodoListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("todo_list failed: {err}"),
        },
    }
}

/// Lists todos grouped by category.
///
/// `sorted = false` keeps first-seen category order; `true` sorts labels.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_groups(sorted: bool) -> TodoGroupsResponse {
    let order = if sorted {
        GroupOrder::Lexicographic
    } else {
        GroupOrder::FirstSeen
    };
    let result = with_store(|store| {
        Ok(store
            .groups_by_category(order)
            .into_iter()
            .map(|group| TodoGroupEntry {
                category: group.category.map(str::to_string),
                items: group.items.into_iter().map(to_entry).collect(),
            })
            .collect::<Vec<_>>())
    });

    match result {
        Ok(groups) => TodoGroupsResponse {
            ok: true,
            message: format!("{} group(s).", groups.len()),
            groups,
        },
        Err(err) => TodoGroupsResponse {
            ok: false,
            groups: Vec::new(),
            message: format!("todo_groups failed: {err}"),
        },
    }
}

/// Appends a todo. Text and category are stored as given.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_create(text: String, category: Option<String>) -> TodoActionResponse {
    let result = with_store(|store| {
        let id = match category {
            Some(category) => store.create_in_category(text, category),
            None => store.create(text),
        };
        ensure_persisted(store)?;
        Ok(id)
    });
    respond("todo_create", "Todo created.", result)
}

/// Sets completion state by todo ID.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_set_completed(todo_id: String, is_completed: bool) -> TodoActionResponse {
    let result = with_todo(&todo_id, |store, id| {
        store.set_completed(id, is_completed).map_err(|err| err.to_string())
    });
    respond("todo_set_completed", "Todo updated.", result)
}

/// Replaces todo text by ID.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_edit_text(todo_id: String, text: String) -> TodoActionResponse {
    let result = with_todo(&todo_id, |store, id| {
        store.edit_text(id, text).map_err(|err| err.to_string())
    });
    respond("todo_edit_text", "Todo updated.", result)
}

/// Replaces todo category by ID. `None` clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_set_category(todo_id: String, category: Option<String>) -> TodoActionResponse {
    let result = with_todo(&todo_id, |store, id| {
        store.set_category(id, category).map_err(|err| err.to_string())
    });
    respond("todo_set_category", "Todo updated.", result)
}

/// Deletes a todo by ID.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(todo_id: String) -> TodoActionResponse {
    let result = with_todo(&todo_id, |store, id| {
        store.delete(id).map(|_| ()).map_err(|err| err.to_string())
    });
    respond("todo_delete", "Todo deleted.", result)
}

fn respond(
    operation: &str,
    message: &str,
    result: Result<TodoId, String>,
) -> TodoActionResponse {
    match result {
        Ok(id) => TodoActionResponse::success(message, id),
        Err(err) => {
            warn!("event={operation} module=ffi status=error error={err}");
            TodoActionResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn storage_config() -> &'static StorageConfig {
    STORAGE_CONFIG.get_or_init(StorageConfig::from_env)
}

fn with_store<T>(
    f: impl FnOnce(&mut SqliteTodoStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = STORE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let config = storage_config();
    let conn = open_db(&config.db_path).map_err(|err| format!("todo DB open failed: {err}"))?;
    let register = SqliteRegister::try_new(&conn)
        .map_err(|err| format!("todo register init failed: {err}"))?;
    let mut store = TodoStore::open(RegisterTodoRepository::with_key(
        register,
        config.key.as_str(),
    ));
    f(&mut store)
}

fn with_todo(
    todo_id: &str,
    f: impl FnOnce(&mut SqliteTodoStore<'_>, TodoId) -> Result<(), String>,
) -> Result<TodoId, String> {
    let id = parse_todo_id(todo_id)?;
    with_store(|store| {
        f(store, id)?;
        ensure_persisted(store)?;
        Ok(id)
    })
}

// Each call reloads from the register, so an unsaved change is lost on return.
fn ensure_persisted(store: &SqliteTodoStore<'_>) -> Result<(), String> {
    match store.last_persist_error() {
        Some(failure) => Err(format!("change was not saved: {}", failure.error)),
        None => Ok(()),
    }
}

fn parse_todo_id(raw: &str) -> Result<TodoId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid todo id `{}`", raw.trim()))
}

fn to_entry(item: &TodoItem) -> TodoEntry {
    TodoEntry {
        todo_id: item.id.to_string(),
        text: item.text.clone(),
        is_completed: item.is_completed,
        category: item.category.clone(),
    }
}
