//! Storage layer
//!
//! A small key-value abstraction over a size-bounded durable store. Values
//! are UTF-8 JSON text; parsing them is the caller's job.
//!
//! ## Backends
//!
//! - [`FileStore`]: one file per key under a directory, atomic writes
//! - [`MemoryStore`]: in-process map, used for tests and throwaway sessions
//!
//! Both enforce an optional byte quota over all stored keys and values, and
//! report a rejected write as [`StorageError::QuotaExceeded`].

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key-value store used by the repository
pub trait KeyValueStore {
    /// Read the value under `key`, `None` if absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    ///
    /// The write is all-or-nothing for a single key.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// All keys currently stored, sorted
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Bytes currently held (keys plus values)
    fn usage(&self) -> StorageResult<u64>;
}

/// Bytes an entry counts against the quota
pub(crate) fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

/// Reject a write that would push usage past the quota
pub(crate) fn check_quota(
    key: &str,
    current_usage: u64,
    replaced: u64,
    added: u64,
    quota: Option<u64>,
) -> StorageResult<()> {
    let Some(quota) = quota else {
        return Ok(());
    };

    let needed = current_usage.saturating_sub(replaced) + added;
    if needed > quota {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            needed,
            quota,
        });
    }
    Ok(())
}
