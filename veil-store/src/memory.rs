use std::collections::HashMap;
use std::sync::RwLock;
use veil_core::KvStore;

/// In-process `KvStore`. Writers replace whole values under one lock, so
/// last-write-wins across flows without finer-grained coordination.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("kv lock poisoned")
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.entries
            .write()
            .expect("kv lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().expect("kv lock poisoned").remove(key);
    }
}
