//! In-process store backed by a sorted map.

use crate::error::StoreError;
use crate::store::tree::{Backend, Entry, TreeStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, Entry>>,
    index: AtomicU64,
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, entry: &Entry) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_string(), entry.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Entry)>, StoreError> {
        let entries = self.entries.read();
        Ok(entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect())
    }

    fn next_index(&self) -> Result<u64, StoreError> {
        Ok(self.index.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Hierarchical store kept entirely in memory.
pub type MemoryStore = TreeStore<MemoryBackend>;

impl TreeStore<MemoryBackend> {
    pub fn new() -> Self {
        TreeStore::with_backend(MemoryBackend::default())
    }
}

impl Default for TreeStore<MemoryBackend> {
    fn default() -> Self {
        Self::new()
    }
}
