//! Inkwell Core Library
//!
//! This crate provides the persistence and state-synchronization layer for
//! Inkwell, a single-user local blog post store.
//!
//! # Architecture
//!
//! - **Storage**: key-value store (`FileStore` on disk, `MemoryStore` in memory)
//! - **Repository**: the post collection under one key, full-collection writes
//! - **Synchronizer**: observable in-memory snapshot, write-through to storage
//! - **Data**: export, import, backups and storage statistics
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut posts = Synchronizer::open(FileStore::from_config(&config));
//!
//! let post = posts.add_post(PostDraft::new("Title", "Body", Author::new("Ada")))?;
//! posts.create_backup()?;
//! ```
//!
//! # Modules
//!
//! - `synchronizer`: Snapshot owner (main entry point)
//! - `repository`: CRUD over the stored collection
//! - `models`: Post, author, category and patch types
//! - `storage`: Key-value backends and errors
//! - `data`: Export/import/backup/stats
//! - `catalog`: Built-in category catalog
//! - `seed`: Seed collection and default images
//! - `config`: Application configuration

pub mod catalog;
pub mod config;
pub mod data;
pub mod models;
pub mod repository;
pub mod seed;
pub mod storage;
pub mod synchronizer;

pub use config::Config;
pub use data::{Backup, BackupInfo, ExportFile, StorageStats};
pub use models::{Author, Category, Post, PostDraft, PostPatch};
pub use repository::PostRepository;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use synchronizer::{Phase, Snapshot, Synchronizer};
