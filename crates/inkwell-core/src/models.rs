//! Data models for Inkwell
//!
//! Defines the blog post entity and the shapes used to create and patch it.
//! Serialized field names are camelCase and field order is stable, so the
//! stored JSON reads `id, title, content, author, createdAt, excerpt, image,
//! category`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of content characters kept in an excerpt
pub const EXCERPT_LEN: usize = 150;

/// Marker appended to truncated excerpts
pub const ELLIPSIS: &str = "...";

/// Post author
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Avatar URL or embedded image data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// A category reference, copied from the catalog into each post
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub description: String,
}

/// A blog post
///
/// Only `id` is mandatory when reading stored or imported data; every other
/// field falls back to its default so loosely-shaped entries still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier, never changed after creation
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Author,
    /// Calendar date the post was created
    #[serde(default = "epoch_date")]
    pub created_at: NaiveDate,
    /// Content preview, computed once when the post is created
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Post {
    /// Category id, if the post has one
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.id.as_str())
    }

    /// Apply a patch by shallow field replacement
    ///
    /// `id`, `created_at` are not patchable; `excerpt` only changes when the
    /// patch names it explicitly.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
    }
}

/// A post as submitted for creation: everything except the fields the
/// repository derives (`id`, `created_at`, `excerpt`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub author: Author,
    /// Empty or missing images are replaced from the default pool
    pub image: Option<String>,
    pub category: Option<Category>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author,
            image: None,
            category: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// Partial update for a post; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Replaced wholesale, never merged field by field
    pub author: Option<Author>,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    pub category: Option<Category>,
}

impl PostPatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.excerpt.is_none()
            && self.image.is_none()
            && self.category.is_none()
    }
}

/// Build an excerpt: the first [`EXCERPT_LEN`] characters of `content`,
/// followed by [`ELLIPSIS`] when anything was cut
pub fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_LEN) {
        Some((cut, _)) => format!("{}{}", &content[..cut], ELLIPSIS),
        None => content.to_string(),
    }
}

fn epoch_date() -> NaiveDate {
    NaiveDate::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: "42".to_string(),
            title: "Title".to_string(),
            content: "Body".to_string(),
            author: Author::new("Ada"),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            excerpt: "Body".to_string(),
            image: Some("https://example.com/a.png".to_string()),
            category: None,
        }
    }

    #[test]
    fn test_excerpt_short_content_is_unchanged() {
        assert_eq!(excerpt("C"), "C");
        assert_eq!(excerpt(""), "");
    }

    #[test]
    fn test_excerpt_at_boundary() {
        let exact = "a".repeat(EXCERPT_LEN);
        assert_eq!(excerpt(&exact), exact);

        let over = "b".repeat(EXCERPT_LEN + 1);
        assert_eq!(excerpt(&over), format!("{}...", "b".repeat(EXCERPT_LEN)));
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let content = "é".repeat(EXCERPT_LEN + 10);
        let result = excerpt(&content);
        assert_eq!(result.chars().count(), EXCERPT_LEN + ELLIPSIS.len());
        assert!(result.starts_with("é"));
    }

    #[test]
    fn test_serialized_field_order() {
        let mut post = sample_post();
        post.category = Some(Category {
            id: "travel".to_string(),
            name: "Travel".to_string(),
            color: "#4ECDC4".to_string(),
            icon: "✈️".to_string(),
            description: "Journeys".to_string(),
        });
        let json = serde_json::to_string(&post).unwrap();

        let positions: Vec<usize> = [
            "\"id\"",
            "\"title\"",
            "\"content\"",
            "\"author\"",
            "\"createdAt\"",
            "\"excerpt\"",
            "\"image\"",
            "\"category\"",
        ]
        .iter()
        .map(|field| json.find(field).unwrap())
        .collect();

        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(json.contains("\"createdAt\":\"2024-01-15\""));
        assert!(json.ends_with("\"description\":\"Journeys\"}}"));
    }

    #[test]
    fn test_lenient_deserialization() {
        let post: Post = serde_json::from_str(r#"{"id":"7","title":"Only a title"}"#).unwrap();
        assert_eq!(post.id, "7");
        assert_eq!(post.title, "Only a title");
        assert!(post.content.is_empty());
        assert!(post.image.is_none());
        assert!(post.category.is_none());
    }

    #[test]
    fn test_apply_patch_replaces_only_named_fields() {
        let mut post = sample_post();
        let before = post.clone();

        post.apply(PostPatch {
            title: Some("X".to_string()),
            ..Default::default()
        });

        assert_eq!(post.title, "X");
        assert_eq!(post.id, before.id);
        assert_eq!(post.created_at, before.created_at);
        assert_eq!(post.content, before.content);
        assert_eq!(post.excerpt, before.excerpt);
        assert_eq!(post.author, before.author);
    }

    #[test]
    fn test_apply_patch_replaces_author_wholesale() {
        let mut post = sample_post();
        post.author = Author::new("Ada").with_avatar("https://example.com/ada.png");

        post.apply(PostPatch {
            author: Some(Author::new("Grace")),
            ..Default::default()
        });

        assert_eq!(post.author.name, "Grace");
        assert!(post.author.avatar.is_none());
    }

    #[test]
    fn test_apply_patch_does_not_recompute_excerpt() {
        let mut post = sample_post();

        post.apply(PostPatch {
            content: Some("A completely different body".to_string()),
            ..Default::default()
        });

        assert_eq!(post.excerpt, "Body");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(PostPatch::default().is_empty());
        let patch = PostPatch {
            image: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
