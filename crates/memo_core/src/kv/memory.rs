use super::{KeyValueRegister, KvResult};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Process-local register. Values live as long as the register itself.
#[derive(Debug, Default)]
pub struct InMemoryRegister {
    entries: RefCell<HashMap<String, Value>>,
}

impl InMemoryRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a register pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: Value) -> Self {
        let register = Self::new();
        register.entries.borrow_mut().insert(key.into(), value);
        register
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueRegister for InMemoryRegister {
    fn get(&self, key: &str) -> KvResult<Option<Value>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> KvResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}
