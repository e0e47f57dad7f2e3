//! Data management: export, import, backups and storage statistics
//!
//! Formats:
//! - Export: pretty-printed JSON array of posts, `blog-data-<YYYY-MM-DD>.json`
//! - Backup: `{ "timestamp", "blogs", "count" }` stored under
//!   `blog_backup_<ISO-8601 timestamp>`, plus `-N` when a backup from the
//!   same millisecond exists; backups are never pruned
//! - Import: each entry is read as a [`Post`]; fields a post does not have
//!   are dropped, missing ones take their defaults

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::Post;
use crate::storage::error::json_type_name;
use crate::storage::{KeyValueStore, StorageError, StorageResult};
use crate::synchronizer::Synchronizer;

/// Key prefix for backups
pub const BACKUP_PREFIX: &str = "blog_backup_";

/// MIME type of export files
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// An export ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Stored backup body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Backup {
    pub timestamp: String,
    pub blogs: Vec<Post>,
    pub count: usize,
}

/// A backup as listed
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BackupInfo {
    pub key: String,
    pub timestamp: String,
    /// `None` if the stored backup could not be parsed
    pub count: Option<usize>,
}

/// Point-in-time storage statistics
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StorageStats {
    /// Posts in the snapshot
    pub post_count: usize,
    /// Bytes of the stored collection value
    pub size_bytes: u64,
    pub backup_count: usize,
    /// Bytes held by the whole store, backups included
    pub total_bytes: u64,
    pub taken_at: DateTime<Utc>,
}

impl StorageStats {
    /// Collection size formatted for display
    pub fn size_human(&self) -> String {
        format_bytes(self.size_bytes)
    }
}

/// Serialize posts into an export file named for `date`
pub fn export_posts(posts: &[Post], date: NaiveDate) -> StorageResult<ExportFile> {
    let json = serde_json::to_string_pretty(posts)?;
    Ok(ExportFile {
        filename: format!("blog-data-{}.json", date.format("%Y-%m-%d")),
        mime_type: EXPORT_MIME_TYPE,
        bytes: json.into_bytes(),
    })
}

/// Parse import text into posts
///
/// The payload must be a JSON array. Entries are accepted as long as they
/// deserialize as a post; missing fields take their defaults and unknown
/// fields are dropped. One entry that is not a post (no `id`, wrong types)
/// rejects the whole import.
pub fn parse_import(text: &str) -> StorageResult<Vec<Post>> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        other => {
            return Err(StorageError::InvalidImportShape {
                found: json_type_name(&other),
            })
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry).map_err(|e| StorageError::InvalidImportEntry {
                index,
                details: e.to_string(),
            })
        })
        .collect()
}

/// ISO-8601 timestamp with millisecond precision, `Z` suffix
fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Collision suffix of a backup key, 0 when there is none
fn backup_seq(key: &str) -> u32 {
    key.rsplit_once('-')
        .and_then(|(_, seq)| seq.parse().ok())
        .unwrap_or(0)
}

/// Format a byte count as Bytes / KB / MB
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

impl<S: KeyValueStore> Synchronizer<S> {
    /// Export the snapshot, named for today's date
    pub fn export_data(&self) -> StorageResult<ExportFile> {
        export_posts(self.posts(), Utc::now().date_naive())
    }

    /// Replace the stored collection with imported posts and reload
    ///
    /// Nothing is written if the text is not a JSON array of posts.
    /// Returns the number of posts now in the snapshot.
    pub fn import_data(&mut self, text: &str) -> StorageResult<usize> {
        self.ensure_ready()?;

        let posts = match parse_import(text) {
            Ok(posts) => posts,
            Err(e) => {
                warn!("Import rejected: {}", e);
                return Err(e);
            }
        };

        self.repository().write_all(&posts)?;
        self.reload()?;

        info!("Imported {} posts", posts.len());
        Ok(self.posts().len())
    }

    /// Store a timestamped copy of the snapshot under its own key
    pub fn create_backup(&self) -> StorageResult<BackupInfo> {
        self.ensure_ready()?;

        let timestamp = iso_timestamp(Utc::now());
        let key = self.unused_backup_key(&timestamp)?;
        let backup = Backup {
            timestamp: timestamp.clone(),
            blogs: self.posts().to_vec(),
            count: self.posts().len(),
        };

        let json = serde_json::to_string_pretty(&backup)?;
        self.repository().store().set(&key, &json)?;

        info!("Backup created: {}", key);
        Ok(BackupInfo {
            key,
            timestamp,
            count: Some(backup.count),
        })
    }

    /// `blog_backup_<timestamp>`, or with a `-N` suffix if a backup from the
    /// same millisecond already holds that key
    fn unused_backup_key(&self, timestamp: &str) -> StorageResult<String> {
        let store = self.repository().store();
        let base = format!("{}{}", BACKUP_PREFIX, timestamp);

        let mut key = base.clone();
        let mut suffix = 0u32;
        while store.get(&key)?.is_some() {
            suffix += 1;
            key = format!("{}-{}", base, suffix);
        }
        Ok(key)
    }

    /// All stored backups, newest first
    ///
    /// The timestamp comes from the stored backup; unreadable backups fall
    /// back to the key suffix.
    pub fn list_backups(&self) -> StorageResult<Vec<BackupInfo>> {
        let store = self.repository().store();

        let mut backups = Vec::new();
        for key in store.keys()? {
            let Some(suffix) = key.strip_prefix(BACKUP_PREFIX) else {
                continue;
            };
            let stored = store
                .get(&key)?
                .and_then(|raw| serde_json::from_str::<Backup>(&raw).ok());
            let (timestamp, count) = match stored {
                Some(backup) => (backup.timestamp, Some(backup.count)),
                None => (suffix.to_string(), None),
            };
            backups.push(BackupInfo {
                key,
                timestamp,
                count,
            });
        }

        // Same-millisecond backups order by key, suffixed keys being later
        backups.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| backup_seq(&b.key).cmp(&backup_seq(&a.key)))
        });
        Ok(backups)
    }

    /// Read storage statistics
    pub fn stats(&self) -> StorageResult<StorageStats> {
        let store = self.repository().store();

        let size_bytes = self
            .repository()
            .read_raw()?
            .map(|raw| raw.len() as u64)
            .unwrap_or(0);
        let backup_count = store
            .keys()?
            .iter()
            .filter(|key| key.starts_with(BACKUP_PREFIX))
            .count();

        Ok(StorageStats {
            post_count: self.posts().len(),
            size_bytes,
            backup_count,
            total_bytes: store.usage()?,
            taken_at: Utc::now(),
        })
    }
}
