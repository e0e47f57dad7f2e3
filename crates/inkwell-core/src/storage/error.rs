//! Storage error handling
//!
//! Provides typed errors for storage operations with descriptive messages
//! and recovery suggestions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store rejected a write because it would exceed its capacity
    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { key: String, needed: u64, quota: u64 },

    /// Disk is full at the filesystem level
    #[error("Disk full while writing '{path}'. Free up disk space and try again.")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing store could not be read or written
    #[error("Storage unavailable at '{path}': {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stored value is not valid JSON of the expected shape
    #[error("Stored value under '{key}' is corrupted: {details}")]
    CorruptData { key: String, details: String },

    /// Failed to serialize a value for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Import payload is not a JSON array
    #[error("Invalid import format: expected a JSON array of posts, found {found}")]
    InvalidImportShape { found: &'static str },

    /// An element of an import payload is not a post
    #[error("Invalid import format: entry {index} is not a post: {details}")]
    InvalidImportEntry { index: usize, details: String },

    /// Operation issued before the synchronizer finished loading
    #[error("Store is not ready: wait for the initial load to finish")]
    NotReady,

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            _ if is_disk_full_error(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            _ => StorageError::Unavailable {
                path,
                source: error,
            },
        }
    }

    /// Whether the store ran out of space (quota or disk)
    pub fn is_storage_full(&self) -> bool {
        matches!(
            self,
            StorageError::QuotaExceeded { .. } | StorageError::DiskFull { .. }
        )
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::QuotaExceeded { .. }
                | StorageError::DiskFull { .. }
                | StorageError::PermissionDenied { .. }
                | StorageError::CorruptData { .. }
                | StorageError::InvalidImportShape { .. }
                | StorageError::InvalidImportEntry { .. }
                | StorageError::NotReady
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::QuotaExceeded { .. } => {
                Some("Delete some posts or old backups, or raise quota_bytes in the configuration.")
            }
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } => {
                Some("Check file and directory permissions for the data directory.")
            }
            StorageError::CorruptData { .. } => {
                Some("The seed collection is used instead. Export or back up your data before making changes if you want to recover it manually.")
            }
            StorageError::InvalidImportShape { .. } | StorageError::InvalidImportEntry { .. } => {
                Some("Import a file produced by `inkwell data export`.")
            }
            StorageError::NotReady => Some("Retry once loading has finished."),
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Name of a JSON value's type, for error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::from_io(io_err, PathBuf::from("/test/path"));

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_disk_full_detection() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StorageError::from_io(io_err, PathBuf::from("/full/disk"));

        assert!(matches!(err, StorageError::DiskFull { .. }));
        assert!(err.is_storage_full());
    }

    #[test]
    fn test_other_io_is_unavailable() {
        let io_err = io::Error::new(io::ErrorKind::Other, "device not configured");
        let err = StorageError::from_io(io_err, PathBuf::from("/mnt/gone"));

        assert!(matches!(err, StorageError::Unavailable { .. }));
        assert!(!err.is_storage_full());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_quota_display() {
        let err = StorageError::QuotaExceeded {
            key: "blog_data".to_string(),
            needed: 6000,
            quota: 5000,
        };

        let msg = err.to_string();
        assert!(msg.contains("quota exceeded"));
        assert!(msg.contains("blog_data"));
        assert!(err.is_storage_full());
    }

    #[test]
    fn test_import_shape_display() {
        let value: serde_json::Value = serde_json::from_str(r#"{"a":1}"#).unwrap();
        let err = StorageError::InvalidImportShape {
            found: json_type_name(&value),
        };

        assert!(err.to_string().contains("an object"));
        assert!(err.recovery_suggestion().is_some());
    }
}
