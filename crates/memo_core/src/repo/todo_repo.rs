//! Todo repository contract and register-backed implementation.
//!
//! # Responsibility
//! - Map `TodoItem` sequences to and from plain field-maps.
//! - Keep register key and schema details inside the persistence boundary.
//!
//! # Invariants
//! - Records missing `text` or `isCompleted`, or holding a field of the wrong
//!   type, are dropped individually; the rest keep their relative order.
//! - `category` and `id` are optional on read, so records written before
//!   either field existed stay readable. Records without a usable `id`, or
//!   repeating an id already decoded in the same load, are assigned a fresh one.
//! - There is no schema version tag; making a field required on read would
//!   drop every older record that lacks it.

use crate::kv::{KeyValueRegister, KvError};
use crate::model::todo::{TodoId, TodoItem};
use log::{error, info, warn};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Register key holding the full todo sequence.
pub const TODOS_KEY: &str = "todos";

const FIELD_ID: &str = "id";
const FIELD_TEXT: &str = "text";
const FIELD_COMPLETED: &str = "isCompleted";
const FIELD_CATEGORY: &str = "category";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence.
#[derive(Debug)]
pub enum RepoError {
    Register(KvError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Register(err) => Some(err),
        }
    }
}

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        Self::Register(value)
    }
}

/// Persistence interface injected into the item store.
pub trait TodoRepository {
    /// Replaces the stored sequence with `items`.
    fn save(&self, items: &[TodoItem]) -> RepoResult<()>;
    /// Reads the stored sequence. Absent or malformed data yields an empty list.
    fn load(&self) -> Vec<TodoItem>;
}

/// Result of lenient decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOutcome {
    pub items: Vec<TodoItem>,
    /// Number of stored records skipped because of missing or mistyped fields.
    pub dropped: usize,
}

/// Todo repository writing one JSON array under a single register key.
pub struct RegisterTodoRepository<R: KeyValueRegister> {
    register: R,
    key: String,
}

impl<R: KeyValueRegister> RegisterTodoRepository<R> {
    /// Creates a repository using the default `todos` key.
    pub fn new(register: R) -> Self {
        Self::with_key(register, TODOS_KEY)
    }

    pub fn with_key(register: R, key: impl Into<String>) -> Self {
        Self {
            register,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn register(&self) -> &R {
        &self.register
    }
}

impl<R: KeyValueRegister> TodoRepository for RegisterTodoRepository<R> {
    fn save(&self, items: &[TodoItem]) -> RepoResult<()> {
        self.register.set(&self.key, &encode_todos(items))?;
        Ok(())
    }

    fn load(&self) -> Vec<TodoItem> {
        let stored = match self.register.get(&self.key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                info!("event=todo_load module=repo status=ok count=0 reason=absent");
                return Vec::new();
            }
            Err(err) => {
                error!(
                    "event=todo_load module=repo status=error error_code=register_read_failed error={err}"
                );
                return Vec::new();
            }
        };

        let outcome = decode_todos(&stored);
        if outcome.dropped > 0 {
            warn!(
                "event=todo_load module=repo status=partial count={} dropped={}",
                outcome.items.len(),
                outcome.dropped
            );
        } else {
            info!(
                "event=todo_load module=repo status=ok count={}",
                outcome.items.len()
            );
        }
        outcome.items
    }
}

/// Encodes items as an ordered array of field-maps.
pub fn encode_todos(items: &[TodoItem]) -> Value {
    Value::Array(items.iter().map(encode_todo).collect())
}

fn encode_todo(item: &TodoItem) -> Value {
    let mut record = Map::new();
    record.insert(FIELD_ID.to_string(), Value::String(item.id.to_string()));
    record.insert(FIELD_TEXT.to_string(), Value::String(item.text.clone()));
    record.insert(FIELD_COMPLETED.to_string(), Value::Bool(item.is_completed));
    if let Some(category) = &item.category {
        record.insert(FIELD_CATEGORY.to_string(), Value::String(category.clone()));
    }
    Value::Object(record)
}

/// Decodes a stored value, dropping records that fail field validation.
///
/// A non-array value decodes to an empty outcome with `dropped == 0`.
pub fn decode_todos(value: &Value) -> DecodeOutcome {
    let Some(records) = value.as_array() else {
        return DecodeOutcome::default();
    };

    let mut outcome = DecodeOutcome::default();
    let mut seen_ids: HashSet<TodoId> = HashSet::with_capacity(records.len());
    for record in records {
        match decode_todo(record) {
            Some(mut item) => {
                // Later records sharing an id are re-keyed so id addressing stays unambiguous.
                while !seen_ids.insert(item.id) {
                    item.id = Uuid::new_v4();
                }
                outcome.items.push(item);
            }
            None => outcome.dropped += 1,
        }
    }
    outcome
}

fn decode_todo(record: &Value) -> Option<TodoItem> {
    let fields = record.as_object()?;
    let text = fields.get(FIELD_TEXT)?.as_str()?;
    let is_completed = fields.get(FIELD_COMPLETED)?.as_bool()?;
    let category = match fields.get(FIELD_CATEGORY) {
        None | Some(Value::Null) => None,
        Some(Value::String(category)) => Some(category.clone()),
        Some(_) => return None,
    };

    Some(TodoItem {
        id: decode_id(fields.get(FIELD_ID)),
        text: text.to_string(),
        is_completed,
        category,
    })
}

fn decode_id(raw: Option<&Value>) -> TodoId {
    raw.and_then(Value::as_str)
        .and_then(|text| Uuid::parse_str(text).ok())
        .filter(|id| !id.is_nil())
        .unwrap_or_else(Uuid::new_v4)
}
