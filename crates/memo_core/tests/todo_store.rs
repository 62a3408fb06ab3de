use memo_core::{
    encode_todos, GroupOrder, InMemoryRegister, KeyValueRegister, KvError, KvResult,
    RegisterTodoRepository, StoreError, TodoStore, TODOS_KEY,
};
use serde_json::{json, Value};
use std::cell::Cell;
use uuid::Uuid;

fn open_store(register: &InMemoryRegister) -> TodoStore<RegisterTodoRepository<&InMemoryRegister>> {
    TodoStore::open(RegisterTodoRepository::new(register))
}

fn stored(register: &InMemoryRegister) -> Value {
    register
        .get(TODOS_KEY)
        .unwrap()
        .expect("todos should be persisted")
}

fn texts<R: memo_core::TodoRepository>(store: &TodoStore<R>) -> Vec<String> {
    store.list().iter().map(|item| item.text.clone()).collect()
}

#[test]
fn create_appends_open_item() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);

    let id = store.create("Buy milk");

    assert_eq!(store.len(), 1);
    let item = &store.list()[0];
    assert_eq!(item.id, id);
    assert_eq!(item.text, "Buy milk");
    assert!(!item.is_completed);
    assert_eq!(item.category(), None);
}

#[test]
fn create_accepts_empty_text() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);

    let id = store.create("");

    assert_eq!(store.get(id).map(|item| item.text.as_str()), Some(""));
}

#[test]
fn set_completed_is_idempotent() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);
    store.create("a");
    store.create("b");

    store.set_completed_at(1, true);
    store.set_completed_at(1, true);

    assert!(store.list()[1].is_completed);
    assert!(!store.list()[0].is_completed);
}

#[test]
fn delete_shifts_positions_and_aliases_later_items() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);
    store.create("A");
    let b = store.create("B");
    let c = store.create("C");

    let removed = store.delete_at(1);
    assert_eq!(removed.id, b);
    assert_eq!(texts(&store), vec!["A", "C"]);

    // Position 1 now names the item formerly at position 2.
    store.set_completed_at(1, true);
    assert!(store.get(c).unwrap().is_completed);
    assert_eq!(store.position_of(c), Some(1));
    assert_eq!(store.position_of(b), None);
}

#[test]
#[should_panic(expected = "index 3 out of bounds for length 3")]
fn set_completed_at_stale_index_panics() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);
    store.create("A");
    store.create("B");
    store.create("C");

    store.set_completed_at(3, true);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn delete_at_on_empty_store_panics() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);
    store.delete_at(0);
}

#[test]
fn id_operations_follow_item_across_deletes() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);
    let a = store.create("A");
    let b = store.create("B");
    let c = store.create("C");

    store.delete(a).unwrap();
    store.set_completed(c, true).unwrap();
    store.edit_text(b, "B2").unwrap();

    assert_eq!(texts(&store), vec!["B2", "C"]);
    assert!(!store.get(b).unwrap().is_completed);
    assert!(store.get(c).unwrap().is_completed);
}

#[test]
fn unknown_id_is_not_found_and_does_not_persist() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);
    let missing = Uuid::new_v4();

    assert_eq!(store.set_completed(missing, true), Err(StoreError::NotFound(missing)));
    assert_eq!(store.edit_text(missing, "x"), Err(StoreError::NotFound(missing)));
    assert_eq!(store.toggle_completed(missing), Err(StoreError::NotFound(missing)));
    assert!(matches!(store.delete(missing), Err(StoreError::NotFound(id)) if id == missing));
    assert_eq!(register.get(TODOS_KEY).unwrap(), None);
}

#[test]
fn every_mutation_persists_full_sequence() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);

    let a = store.create("A");
    assert_eq!(stored(&register), encode_todos(store.list()));

    let b = store.create_in_category("B", "work");
    assert_eq!(stored(&register), encode_todos(store.list()));

    store.set_completed(a, true).unwrap();
    assert_eq!(stored(&register), encode_todos(store.list()));

    store.edit_text(b, "B edited").unwrap();
    assert_eq!(stored(&register), encode_todos(store.list()));

    store.set_category(b, None).unwrap();
    assert_eq!(stored(&register), encode_todos(store.list()));

    store.toggle_completed(b).unwrap();
    assert_eq!(stored(&register), encode_todos(store.list()));

    store.delete(a).unwrap();
    assert_eq!(stored(&register), encode_todos(store.list()));
    assert_eq!(stored(&register).as_array().unwrap().len(), 1);
}

#[test]
fn reopening_restores_previous_session() {
    let register = InMemoryRegister::new();
    let (a, b) = {
        let mut store = open_store(&register);
        let a = store.create_in_category("A", "home");
        let b = store.create("B");
        store.set_completed(a, true).unwrap();
        (a, b)
    };

    let store = open_store(&register);
    assert_eq!(texts(&store), vec!["A", "B"]);
    assert!(store.get(a).unwrap().is_completed);
    assert_eq!(store.get(a).unwrap().category(), Some("home"));
    assert_eq!(store.position_of(b), Some(1));
}

#[test]
fn open_drops_only_malformed_records() {
    let register = InMemoryRegister::with_entry(
        TODOS_KEY,
        json!([
            {"text": "A", "isCompleted": false},
            {"isCompleted": false},
            {"text": "C", "isCompleted": true}
        ]),
    );

    let store = open_store(&register);

    assert_eq!(texts(&store), vec!["A", "C"]);
}

#[test]
fn groups_partition_items_in_first_seen_order() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);
    store.create_in_category("w1", "work");
    store.create_in_category("h1", "home");
    store.create("loose");
    store.create_in_category("w2", "work");
    store.create_in_category("W3", "Work");

    let groups = store.groups_by_category(GroupOrder::FirstSeen);

    let labels: Vec<_> = groups.iter().map(|group| group.category).collect();
    assert_eq!(labels, vec![Some("work"), Some("home"), None, Some("Work")]);
    let work: Vec<_> = groups[0].items.iter().map(|item| item.text.as_str()).collect();
    assert_eq!(work, vec!["w1", "w2"]);

    let mut regrouped: Vec<_> = groups
        .iter()
        .flat_map(|group| group.items.iter().map(|item| item.id))
        .collect();
    let mut original: Vec<_> = store.list().iter().map(|item| item.id).collect();
    regrouped.sort();
    original.sort();
    assert_eq!(regrouped, original);
}

#[test]
fn groups_are_deterministic_across_calls() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);
    for (text, category) in [("a", "z"), ("b", "m"), ("c", "a"), ("d", "m")] {
        store.create_in_category(text, category);
    }

    let first = store.groups_by_category(GroupOrder::Lexicographic);
    let second = store.groups_by_category(GroupOrder::Lexicographic);
    assert_eq!(first, second);
    let labels: Vec<_> = first.iter().map(|group| group.category).collect();
    assert_eq!(labels, vec![Some("a"), Some("m"), Some("z")]);
}

#[test]
fn groups_of_empty_store_is_empty() {
    let register = InMemoryRegister::new();
    let store = open_store(&register);
    assert!(store.groups_by_category(GroupOrder::default()).is_empty());
}

/// Register whose writes fail until `healthy` is set.
#[derive(Default)]
struct FlakyRegister {
    inner: InMemoryRegister,
    healthy: Cell<bool>,
}

impl KeyValueRegister for FlakyRegister {
    fn get(&self, key: &str) -> KvResult<Option<Value>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &Value) -> KvResult<()> {
        if !self.healthy.get() {
            return Err(KvError::InvalidData("disk full".to_string()));
        }
        self.inner.set(key, value)
    }
}

#[test]
fn persist_failure_keeps_memory_authoritative_and_is_reported() {
    let register = FlakyRegister::default();
    let mut store = TodoStore::open(RegisterTodoRepository::new(&register));

    let id = store.create("kept in memory");

    assert_eq!(store.len(), 1);
    let failure = store.last_persist_error().expect("save failure should be recorded");
    assert_eq!(failure.operation, "create");
    assert!(failure.error.to_string().contains("disk full"));
    assert_eq!(register.inner.get(TODOS_KEY).unwrap(), None);

    register.healthy.set(true);
    store.set_completed(id, true).unwrap();

    assert!(store.last_persist_error().is_none());
    let stored = register.inner.get(TODOS_KEY).unwrap().unwrap();
    assert_eq!(stored, encode_todos(store.list()));
}

#[test]
fn into_parts_returns_items_and_repository() {
    let register = InMemoryRegister::new();
    let mut store = open_store(&register);
    store.create("only");

    let (items, repo) = store.into_parts();
    assert_eq!(items.len(), 1);
    assert_eq!(repo.key(), TODOS_KEY);
}

#[test]
fn items_loaded_with_shared_id_are_addressed_independently() {
    let shared = "6f1c0000-0000-4000-8000-000000000002";
    let register = InMemoryRegister::with_entry(
        TODOS_KEY,
        json!([
            {"id": shared, "text": "first", "isCompleted": false},
            {"id": shared, "text": "second", "isCompleted": false}
        ]),
    );
    let mut store = open_store(&register);
    let second = store.list()[1].id;

    store.set_completed(second, true).unwrap();

    let states: Vec<_> = store
        .list()
        .iter()
        .map(|item| (item.text.as_str(), item.is_completed))
        .collect();
    assert_eq!(states, vec![("first", false), ("second", true)]);
}
