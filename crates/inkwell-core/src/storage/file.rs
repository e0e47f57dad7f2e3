//! Filesystem-backed key-value store
//!
//! Each key is stored as its own file under the store directory:
//!
//! ```text
//! <data_dir>/store/
//! ├── blog_data.json
//! └── blog_backup_2026-10-19T08%3A30%3A00.000Z.json
//! ```
//!
//! Key characters outside `[A-Za-z0-9._-]` are escaped as `%XX` so any key
//! maps to a portable file name. Writes go to a temporary file which is
//! synced and then renamed over the target, so a value is never left
//! half-written.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{check_quota, entry_size, KeyValueStore, StorageError, StorageResult};
use crate::config::Config;

const VALUE_EXTENSION: &str = "json";

/// Key-value store persisting one file per key
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<u64>,
}

impl FileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota: None,
        }
    }

    /// Create a store from configuration (`store_dir()` and quota)
    pub fn from_config(config: &Config) -> Self {
        Self {
            dir: config.store_dir(),
            quota: config.quota(),
        }
    }

    /// Limit total bytes held by the store
    pub fn with_quota(mut self, quota: Option<u64>) -> Self {
        self.quota = quota;
        self
    }

    /// Directory holding the value files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path backing a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), VALUE_EXTENSION))
    }

    /// Stored (key, value size) pairs
    fn entries(&self) -> StorageResult<Vec<(String, u64)>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::from_io(e, self.dir.clone())),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| StorageError::from_io(e, self.dir.clone()))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(decode_key)
            else {
                continue;
            };
            let size = entry
                .metadata()
                .map_err(|e| StorageError::from_io(e, path.clone()))?
                .len();
            entries.push((key, size));
        }

        entries.sort();
        Ok(entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from_io(e, path)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.quota.is_some() {
            let entries = self.entries()?;
            let usage = entries
                .iter()
                .map(|(k, size)| k.len() as u64 + size)
                .sum();
            let replaced = entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(k, size)| k.len() as u64 + size)
                .unwrap_or(0);
            check_quota(key, usage, replaced, entry_size(key, value), self.quota)?;
        }

        atomic_write(&self.path_for(key), value.as_bytes())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, path)),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries()?.into_iter().map(|(key, _)| key).collect())
    }

    fn usage(&self) -> StorageResult<u64> {
        Ok(self
            .entries()?
            .iter()
            .map(|(key, size)| key.len() as u64 + size)
            .sum())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.')
}

/// Escape a key into a file stem
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if is_plain(byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// Reverse of [`encode_key`]; `None` for stems this store did not write
fn decode_key(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = stem.get(i + 1..i + 3)?;
                decoded.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            byte if is_plain(byte) => {
                decoded.push(byte);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(decoded).ok()
}
