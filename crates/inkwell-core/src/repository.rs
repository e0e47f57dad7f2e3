//! Post repository
//!
//! Owns the canonical post collection as stored under a single key. Every
//! mutation reads the full collection, computes the new one, and writes it
//! back as one serialized value. There is no per-post persistence.
//!
//! ## Usage
//!
//! ```ignore
//! let repo = PostRepository::new(MemoryStore::new());
//!
//! let post = repo.add(PostDraft::new("Title", "Body", Author::new("Ada")))?;
//! repo.update(&post.id, PostPatch { title: Some("New".into()), ..Default::default() })?;
//! repo.delete(&post.id)?;
//! ```

use chrono::Utc;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{excerpt, Post, PostDraft, PostPatch};
use crate::seed::{seed_posts, DEFAULT_IMAGES};
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// Key holding the serialized post collection
pub const STORAGE_KEY: &str = "blog_data";

/// Post collection persisted through a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct PostRepository<S> {
    store: S,
}

impl<S: KeyValueStore> PostRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying key-value store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Raw stored value of the collection, if any
    pub fn read_raw(&self) -> StorageResult<Option<String>> {
        self.store.get(STORAGE_KEY)
    }

    /// Read the whole collection
    ///
    /// - Absent key: the seed collection is persisted and returned. If that
    ///   write fails the seed is still returned.
    /// - Unparseable value: the seed collection is returned and the stored
    ///   value is left as it is.
    /// - Store failure: returned as an error.
    pub fn read_all(&self) -> StorageResult<Vec<Post>> {
        let Some(raw) = self.read_raw()? else {
            info!("No stored posts, initializing with seed collection");
            let seed = seed_posts();
            if let Err(e) = self.write_all(&seed) {
                warn!("Failed to persist seed collection: {}", e);
            }
            return Ok(seed);
        };

        match parse_posts(&raw) {
            Ok(posts) => Ok(posts),
            Err(e) => {
                warn!("{}; falling back to seed collection", e);
                Ok(seed_posts())
            }
        }
    }

    /// Overwrite the stored collection
    pub fn write_all(&self, posts: &[Post]) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(posts)?;
        if let Err(e) = self.store.set(STORAGE_KEY, &json) {
            warn!("Failed to write {} posts: {}", posts.len(), e);
            return Err(e);
        }
        debug!("Wrote {} posts ({} bytes)", posts.len(), json.len());
        Ok(())
    }

    /// Create a post from a draft and store it first in the collection
    ///
    /// Assigns a fresh id, today's date and the excerpt; picks a default
    /// image when the draft has none.
    pub fn add(&self, draft: PostDraft) -> StorageResult<Post> {
        let mut posts = self.read_all()?;

        let post = Post {
            id: new_id(&posts),
            excerpt: excerpt(&draft.content),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            created_at: Utc::now().date_naive(),
            image: Some(
                draft
                    .image
                    .filter(|image| !image.trim().is_empty())
                    .unwrap_or_else(random_default_image),
            ),
            category: draft.category,
        };

        posts.insert(0, post.clone());
        self.write_all(&posts)?;

        info!("Added post {}", post.id);
        Ok(post)
    }

    /// Apply a patch to the post with `id`
    ///
    /// Returns `None` (and writes nothing) if there is no such post.
    pub fn update(&self, id: &str, patch: PostPatch) -> StorageResult<Option<Post>> {
        let mut posts = self.read_all()?;

        let Some(post) = posts.iter_mut().find(|post| post.id == id) else {
            debug!("Update skipped, post {} not found", id);
            return Ok(None);
        };
        post.apply(patch);
        let updated = post.clone();

        self.write_all(&posts)?;

        info!("Updated post {}", id);
        Ok(Some(updated))
    }

    /// Remove the post with `id`
    ///
    /// Returns `false` (and writes nothing) if there is no such post.
    pub fn delete(&self, id: &str) -> StorageResult<bool> {
        let posts = self.read_all()?;
        let before = posts.len();

        let remaining: Vec<Post> = posts.into_iter().filter(|post| post.id != id).collect();
        if remaining.len() == before {
            debug!("Delete skipped, post {} not found", id);
            return Ok(false);
        }

        self.write_all(&remaining)?;

        info!("Deleted post {}", id);
        Ok(true)
    }

    /// Look up a single post
    ///
    /// Never writes: on an empty store the seed collection is searched
    /// without being persisted.
    pub fn get_by_id(&self, id: &str) -> StorageResult<Option<Post>> {
        Ok(self.peek_all()?.into_iter().find(|post| post.id == id))
    }

    /// Number of posts, without initializing an empty store
    pub fn count(&self) -> StorageResult<usize> {
        Ok(self.peek_all()?.len())
    }

    /// The collection as `read_all` would return it, minus the seed write
    fn peek_all(&self) -> StorageResult<Vec<Post>> {
        match self.read_raw()? {
            Some(raw) => Ok(parse_posts(&raw).unwrap_or_else(|_| seed_posts())),
            None => Ok(seed_posts()),
        }
    }

    /// Remove the stored collection; the next read starts from the seed
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(STORAGE_KEY)?;
        info!("Cleared stored posts");
        Ok(())
    }
}

/// Parse a stored collection
pub fn parse_posts(raw: &str) -> StorageResult<Vec<Post>> {
    serde_json::from_str(raw).map_err(|e| StorageError::CorruptData {
        key: STORAGE_KEY.to_string(),
        details: e.to_string(),
    })
}

/// Generate an id not already used in `posts`
fn new_id(posts: &[Post]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !posts.iter().any(|post| post.id == id) {
            return id;
        }
    }
}

fn random_default_image() -> String {
    DEFAULT_IMAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;
    use crate::seed::seed_len;
    use crate::storage::MemoryStore;

    fn test_repo() -> (PostRepository<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (PostRepository::new(store.clone()), store)
    }

    fn draft(title: &str, content: &str) -> PostDraft {
        PostDraft::new(title, content, Author::new("A"))
    }

    #[test]
    fn test_read_all_seeds_empty_store() {
        let (repo, store) = test_repo();

        let posts = repo.read_all().unwrap();
        assert_eq!(posts.len(), seed_len());
        assert_eq!(posts, seed_posts());

        // Seed is now persisted
        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(parse_posts(&raw).unwrap(), seed_posts());
    }

    #[test]
    fn test_read_all_corrupt_data_is_not_overwritten() {
        let (repo, store) = test_repo();
        store.set(STORAGE_KEY, "{not json").unwrap();

        let posts = repo.read_all().unwrap();
        assert_eq!(posts, seed_posts());
        assert_eq!(
            store.get(STORAGE_KEY).unwrap().as_deref(),
            Some("{not json")
        );
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_read_all_degrades_when_seed_cannot_be_written() {
        let store = MemoryStore::with_quota(16);
        let repo = PostRepository::new(store.clone());

        let posts = repo.read_all().unwrap();
        assert_eq!(posts.len(), seed_len());
        assert!(store.get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_write_all_then_read_all_round_trips() {
        let (repo, _) = test_repo();
        let mut posts = seed_posts();
        posts.truncate(2);
        posts[1].image = None;
        posts[1].category = None;

        repo.write_all(&posts).unwrap();
        assert_eq!(repo.read_all().unwrap(), posts);
    }

    #[test]
    fn test_write_all_is_pretty_printed() {
        let (repo, store) = test_repo();
        repo.write_all(&seed_posts()[..1]).unwrap();

        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        assert!(raw.starts_with("[\n  {\n    \"id\": \"1\""));
    }

    #[test]
    fn test_add_scenario() {
        let (repo, _) = test_repo();

        let post = repo.add(draft("T", "C")).unwrap();

        assert!(!post.id.is_empty());
        assert_eq!(post.created_at, Utc::now().date_naive());
        assert_eq!(post.excerpt, "C");
        assert!(DEFAULT_IMAGES.contains(&post.image.as_deref().unwrap()));

        let posts = repo.read_all().unwrap();
        assert_eq!(posts[0], post);
        assert_eq!(posts.len(), seed_len() + 1);
    }

    #[test]
    fn test_add_long_content_truncates_excerpt() {
        let (repo, _) = test_repo();
        let content = "x".repeat(200);

        let post = repo.add(draft("T", &content)).unwrap();
        assert_eq!(post.excerpt, format!("{}...", "x".repeat(150)));
    }

    #[test]
    fn test_add_keeps_supplied_image() {
        let (repo, _) = test_repo();

        let post = repo
            .add(draft("T", "C").with_image("data:image/png;base64,AAAA"))
            .unwrap();
        assert_eq!(post.image.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_add_blank_image_uses_default_pool() {
        let (repo, _) = test_repo();

        for _ in 0..10 {
            let post = repo.add(draft("T", "C").with_image("  ")).unwrap();
            assert!(DEFAULT_IMAGES.contains(&post.image.as_deref().unwrap()));
        }
    }

    #[test]
    fn test_add_generates_unique_ids() {
        let (repo, _) = test_repo();

        let a = repo.add(draft("A", "a")).unwrap();
        let b = repo.add(draft("B", "b")).unwrap();
        assert_ne!(a.id, b.id);

        let posts = repo.read_all().unwrap();
        assert_eq!(posts[0].id, b.id);
        assert_eq!(posts[1].id, a.id);
    }

    #[test]
    fn test_add_fails_when_store_is_full() {
        let (repo, _) = test_repo();
        repo.read_all().unwrap();
        let used = repo.store().usage().unwrap();

        let store = MemoryStore::with_quota(used);
        let full_repo = PostRepository::new(store.clone());
        full_repo.write_all(&seed_posts()).unwrap();

        let err = full_repo.add(draft("T", "C")).unwrap_err();
        assert!(err.is_storage_full());
        assert_eq!(full_repo.read_all().unwrap(), seed_posts());
    }

    #[test]
    fn test_update_changes_only_named_fields() {
        let (repo, _) = test_repo();
        let before = repo.get_by_id("2").unwrap().unwrap();

        let updated = repo
            .update(
                "2",
                PostPatch {
                    title: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "X");
        assert_eq!(
            Post {
                title: before.title.clone(),
                ..updated.clone()
            },
            before
        );
        assert_eq!(repo.get_by_id("2").unwrap().unwrap(), updated);
    }

    #[test]
    fn test_update_keeps_position() {
        let (repo, _) = test_repo();

        repo.update(
            "4",
            PostPatch {
                content: Some("New content".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let ids: Vec<_> = repo.read_all().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_update_missing_id_does_not_write() {
        let (repo, store) = test_repo();
        repo.read_all().unwrap();
        let writes = store.writes();

        let result = repo.update("nope", PostPatch::default()).unwrap();
        assert!(result.is_none());
        assert_eq!(store.writes(), writes);
    }

    #[test]
    fn test_delete() {
        let (repo, _) = test_repo();

        assert!(repo.delete("3").unwrap());
        assert!(repo.get_by_id("3").unwrap().is_none());
        assert_eq!(repo.count().unwrap(), seed_len() - 1);
    }

    #[test]
    fn test_delete_missing_id_does_not_write() {
        let (repo, store) = test_repo();
        repo.read_all().unwrap();
        let writes = store.writes();

        assert!(!repo.delete("nope").unwrap());
        assert_eq!(store.writes(), writes);
        assert_eq!(repo.count().unwrap(), seed_len());
    }

    #[test]
    fn test_net_size_across_operations() {
        let (repo, _) = test_repo();
        let start = repo.count().unwrap();

        let a = repo.add(draft("A", "a")).unwrap();
        repo.add(draft("B", "b")).unwrap();
        repo.update(
            &a.id,
            PostPatch {
                title: Some("A2".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(repo.delete(&a.id).unwrap());
        assert!(!repo.delete(&a.id).unwrap());

        assert_eq!(repo.count().unwrap(), start + 1);
    }

    #[test]
    fn test_get_by_id_has_no_side_effects() {
        let (repo, store) = test_repo();
        repo.read_all().unwrap();
        let writes = store.writes();

        assert!(repo.get_by_id("1").unwrap().is_some());
        assert!(repo.get_by_id("missing").unwrap().is_none());
        assert_eq!(store.writes(), writes);
    }

    #[test]
    fn test_get_by_id_on_empty_store_does_not_seed() {
        let (repo, store) = test_repo();

        assert!(repo.get_by_id("1").unwrap().is_some());
        assert_eq!(repo.count().unwrap(), seed_len());
        assert_eq!(store.writes(), 0);
        assert!(store.get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_clear_reseeds_on_next_read() {
        let (repo, store) = test_repo();
        repo.add(draft("A", "a")).unwrap();

        repo.clear().unwrap();
        assert!(store.get(STORAGE_KEY).unwrap().is_none());
        assert_eq!(repo.read_all().unwrap(), seed_posts());
    }
}
