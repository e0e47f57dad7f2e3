use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{check_quota, entry_size, KeyValueStore, StorageResult};

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    writes: usize,
}

/// In-memory key-value store for tests and ephemeral sessions.
///
/// Clones share the same underlying map, so a test can keep a handle while
/// the repository owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    quota: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once `quota` bytes would be exceeded
    pub fn with_quota(quota: u64) -> Self {
        Self {
            inner: Arc::default(),
            quota: Some(quota),
        }
    }

    /// Number of successful `set` calls so far
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.lock();

        let usage: u64 = inner.entries.iter().map(|(k, v)| entry_size(k, v)).sum();
        let replaced = inner
            .entries
            .get(key)
            .map(|old| entry_size(key, old))
            .unwrap_or(0);
        check_quota(key, usage, replaced, entry_size(key, value), self.quota)?;

        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.lock().entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.lock().entries.keys().cloned().collect())
    }

    fn usage(&self) -> StorageResult<u64> {
        Ok(self
            .lock()
            .entries
            .iter()
            .map(|(k, v)| entry_size(k, v))
            .sum())
    }
}
