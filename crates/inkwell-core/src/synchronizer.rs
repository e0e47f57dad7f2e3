//! State synchronizer
//!
//! Holds the in-memory snapshot of the post collection that views render,
//! and keeps it write-through consistent with the [`PostRepository`].
//!
//! ## Lifecycle
//!
//! `Uninitialized → Loading → Ready`, and back to `Uninitialized` on
//! [`shutdown`](Synchronizer::shutdown). Load failures never surface: the
//! seed collection is used and persisted instead. Mutations are rejected with
//! [`StorageError::NotReady`] until the first load has completed.
//!
//! ## Observers
//!
//! Every snapshot change is published on a `watch` channel; views hold a
//! receiver from [`subscribe`](Synchronizer::subscribe).
//!
//! ## Auto-persist
//!
//! Each time a non-empty snapshot is published while `Ready` (including the
//! one that completes a load), the snapshot is written back through
//! `write_all`. After add/update/delete this repeats the repository's own
//! write with identical data; after a load it replaces a corrupt stored value
//! with the collection actually in use. Failures here are logged only.

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::models::{Post, PostDraft, PostPatch};
use crate::repository::PostRepository;
use crate::seed::seed_posts;
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// Synchronizer lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, nothing loaded yet
    Uninitialized,
    /// Reading from the repository
    Loading,
    /// Snapshot loaded; mutations accepted
    Ready,
}

/// What observers see
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub posts: Vec<Post>,
    pub is_loading: bool,
}

/// Write-through cache of the post collection
pub struct Synchronizer<S> {
    repo: PostRepository<S>,
    posts: Vec<Post>,
    phase: Phase,
    snapshot: watch::Sender<Snapshot>,
}

impl<S: KeyValueStore> Synchronizer<S> {
    /// Create an uninitialized synchronizer over `store`
    pub fn new(store: S) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::default());
        Self {
            repo: PostRepository::new(store),
            posts: Vec::new(),
            phase: Phase::Uninitialized,
            snapshot,
        }
    }

    /// Create a synchronizer and run the initial load
    pub fn open(store: S) -> Self {
        let mut sync = Self::new(store);
        sync.load();
        sync
    }

    /// Load the collection from the repository
    ///
    /// Always ends in `Ready`. If the repository fails, the seed collection
    /// becomes the snapshot and is persisted.
    pub fn load(&mut self) {
        self.phase = Phase::Loading;
        self.publish();

        let posts = match self.repo.read_all() {
            Ok(posts) => posts,
            Err(e) => {
                error!("Failed to load posts, using seed collection: {}", e);
                let seed = seed_posts();
                if let Err(e) = self.repo.write_all(&seed) {
                    error!("Failed to persist seed collection: {}", e);
                }
                seed
            }
        };

        info!("Loaded {} posts", posts.len());
        self.posts = posts;
        self.phase = Phase::Ready;
        self.publish();
    }

    /// Re-read the collection and replace the snapshot wholesale
    pub fn reload(&mut self) -> StorageResult<()> {
        self.ensure_ready()?;
        self.load();
        Ok(())
    }

    /// Tear down: drop the snapshot and return to `Uninitialized`
    pub fn shutdown(&mut self) {
        self.posts.clear();
        self.phase = Phase::Uninitialized;
        self.publish();
        debug!("Synchronizer shut down");
    }

    // ==================== Mutations ====================

    /// Create a post; on success it becomes the first snapshot entry
    pub fn add_post(&mut self, draft: PostDraft) -> StorageResult<Post> {
        self.ensure_ready()?;

        let post = self.repo.add(draft)?;
        self.posts.insert(0, post.clone());
        self.publish();
        Ok(post)
    }

    /// Patch a post; `None` if no post has `id`
    pub fn update_post(&mut self, id: &str, patch: PostPatch) -> StorageResult<Option<Post>> {
        self.ensure_ready()?;

        let Some(updated) = self.repo.update(id, patch)? else {
            return Ok(None);
        };
        for post in self.posts.iter_mut().filter(|post| post.id == id) {
            *post = updated.clone();
        }
        self.publish();
        Ok(Some(updated))
    }

    /// Delete a post; `false` if no post has `id`
    pub fn delete_post(&mut self, id: &str) -> StorageResult<bool> {
        self.ensure_ready()?;

        if !self.repo.delete(id)? {
            return Ok(false);
        }
        self.posts.retain(|post| post.id != id);
        self.publish();
        Ok(true)
    }

    /// Write the current snapshot to storage
    pub fn save(&self) -> StorageResult<()> {
        self.ensure_ready()?;
        self.repo.write_all(&self.posts)?;
        info!("Saved {} posts", self.posts.len());
        Ok(())
    }

    // ==================== Queries ====================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The snapshot, in presentation order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Look up a post in the snapshot
    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Posts in a category, snapshot order preserved
    pub fn by_category<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts
            .iter()
            .filter(move |post| post.category_id() == Some(category_id))
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    pub fn repository(&self) -> &PostRepository<S> {
        &self.repo
    }

    pub(crate) fn ensure_ready(&self) -> StorageResult<()> {
        if self.phase != Phase::Ready {
            return Err(StorageError::NotReady);
        }
        Ok(())
    }

    /// Push the snapshot to observers, then auto-persist it
    fn publish(&mut self) {
        self.snapshot.send_replace(Snapshot {
            posts: self.posts.clone(),
            is_loading: self.is_loading(),
        });

        if self.phase == Phase::Ready && !self.posts.is_empty() {
            if let Err(e) = self.repo.write_all(&self.posts) {
                warn!("Auto-persist failed: {}", e);
            }
        }
    }
}
