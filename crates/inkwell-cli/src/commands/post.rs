//! Post command handlers

use anyhow::{anyhow, bail, Context, Result};

use inkwell_core::{catalog, Author, Category, KeyValueStore, PostDraft, PostPatch, Synchronizer};

use crate::editor::{confirm, edit_text, is_interactive, prompt_with_default};
use crate::output::{short_id, Output};

/// Fields accepted by `post add`
pub struct NewPost {
    pub title: String,
    pub content: Option<String>,
    pub author: String,
    pub avatar: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Fields accepted by `post edit`; all `None` means interactive editing
#[derive(Default)]
pub struct PostEdits {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub avatar: Option<String>,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Create a new post
pub fn add<S: KeyValueStore>(
    posts: &mut Synchronizer<S>,
    new: NewPost,
    output: &Output,
) -> Result<()> {
    let content = match new.content {
        Some(content) => content,
        None if is_interactive() => edit_text("")?,
        None => bail!("No content given. Use --content or run interactively to open $EDITOR."),
    };

    let mut author = Author::new(new.author);
    if let Some(avatar) = new.avatar {
        author = author.with_avatar(avatar);
    }

    let mut draft = PostDraft::new(new.title, content.trim_end(), author);
    if let Some(image) = new.image {
        draft = draft.with_image(image);
    }
    if let Some(ref id) = new.category {
        draft = draft.with_category(lookup_category(id)?);
    }

    let post = posts.add_post(draft).context("Failed to create post")?;

    output.success(&format!("Created post: {}", post.id));
    output.print_post(&post);

    Ok(())
}

/// List posts, optionally filtered by category
pub fn list<S: KeyValueStore>(
    posts: &Synchronizer<S>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    match category {
        Some(ref id) => {
            let category = lookup_category(id)?;
            output.print_posts(posts.by_category(&category.id));
        }
        None => output.print_posts(posts.posts()),
    }
    Ok(())
}

/// Show a single post
pub fn show<S: KeyValueStore>(posts: &Synchronizer<S>, id: String, output: &Output) -> Result<()> {
    let id = resolve_post_id(&id, posts)?;
    let post = posts
        .get(&id)
        .ok_or_else(|| anyhow!("Post not found: {}", id))?;

    output.print_post(post);
    Ok(())
}

/// Edit a post
pub fn edit<S: KeyValueStore>(
    posts: &mut Synchronizer<S>,
    id: String,
    edits: PostEdits,
    output: &Output,
) -> Result<()> {
    let id = resolve_post_id(&id, posts)?;

    let patch = if edits_are_empty(&edits) {
        if !is_interactive() {
            bail!("Nothing to change. Pass at least one field flag.");
        }
        prompt_patch(posts, &id)?
    } else {
        build_patch(posts, &id, edits)?
    };

    if patch.is_empty() {
        output.message("No changes.");
        return Ok(());
    }

    let post = posts
        .update_post(&id, patch)
        .context("Failed to update post")?
        .ok_or_else(|| anyhow!("Post not found: {}", id))?;

    output.success("Post updated");
    output.print_post(&post);

    Ok(())
}

/// Delete a post
pub fn delete<S: KeyValueStore>(
    posts: &mut Synchronizer<S>,
    id: String,
    output: &Output,
) -> Result<()> {
    let id = resolve_post_id(&id, posts)?;

    if output.should_prompt() {
        if let Some(post) = posts.get(&id) {
            println!("Delete post: {} - {}", short_id(&post.id), post.title);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if !posts.delete_post(&id).context("Failed to delete post")? {
        bail!("Post not found: {}", id);
    }

    output.success(&format!("Deleted post: {}", id));

    Ok(())
}

fn edits_are_empty(edits: &PostEdits) -> bool {
    edits.title.is_none()
        && edits.content.is_none()
        && edits.author.is_none()
        && edits.avatar.is_none()
        && edits.excerpt.is_none()
        && edits.image.is_none()
        && edits.category.is_none()
}

/// Turn flag values into a patch; an avatar without a name keeps the current name
fn build_patch<S: KeyValueStore>(
    posts: &Synchronizer<S>,
    id: &str,
    edits: PostEdits,
) -> Result<PostPatch> {
    let current = posts
        .get(id)
        .ok_or_else(|| anyhow!("Post not found: {}", id))?;

    let author = match (edits.author, edits.avatar) {
        (None, None) => None,
        (name, avatar) => Some(Author {
            name: name.unwrap_or_else(|| current.author.name.clone()),
            avatar: avatar.or_else(|| current.author.avatar.clone()),
        }),
    };

    let category = match edits.category {
        Some(ref id) => Some(lookup_category(id)?),
        None => None,
    };

    Ok(PostPatch {
        title: edits.title,
        content: edits.content,
        author,
        excerpt: edits.excerpt,
        image: edits.image,
        category,
    })
}

fn prompt_patch<S: KeyValueStore>(posts: &Synchronizer<S>, id: &str) -> Result<PostPatch> {
    let current = posts
        .get(id)
        .ok_or_else(|| anyhow!("Post not found: {}", id))?;

    println!("Editing post: {}", current.id);
    println!("Press Enter to keep current value, or type new value.\n");

    let mut patch = PostPatch {
        title: prompt_with_default("Title", &current.title)?,
        ..PostPatch::default()
    };

    if let Some(name) = prompt_with_default("Author", &current.author.name)? {
        patch.author = Some(Author {
            name,
            avatar: current.author.avatar.clone(),
        });
    }

    let current_category = current.category_id().unwrap_or("");
    if let Some(id) = prompt_with_default("Category", current_category)? {
        patch.category = Some(lookup_category(&id)?);
    }

    patch.image = prompt_with_default("Image", current.image.as_deref().unwrap_or(""))?;

    if confirm("Edit content in $EDITOR?")? {
        let content = edit_text(&current.content)?;
        let content = content.trim_end();
        if content != current.content {
            patch.content = Some(content.to_string());
        }
    }

    Ok(patch)
}

/// Look up a catalog category, listing valid ids on failure
fn lookup_category(id: &str) -> Result<Category> {
    catalog::category(id).ok_or_else(|| {
        anyhow!(
            "Unknown category: '{}'\nValid categories: {}",
            id,
            catalog::category_ids().join(", ")
        )
    })
}

/// Resolve a post ID (exact id or unique prefix)
fn resolve_post_id<S: KeyValueStore>(id: &str, posts: &Synchronizer<S>) -> Result<String> {
    if posts.get(id).is_some() {
        return Ok(id.to_string());
    }

    let matches: Vec<_> = posts
        .posts()
        .iter()
        .filter(|p| p.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No post found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple posts match '{}':", id);
            for post in &matches {
                eprintln!("  {} - {}", post.id, post.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::MemoryStore;

    fn open() -> Synchronizer<MemoryStore> {
        Synchronizer::open(MemoryStore::new())
    }

    #[test]
    fn test_resolve_exact_id() {
        let posts = open();
        assert_eq!(resolve_post_id("1", &posts).unwrap(), "1");
    }

    #[test]
    fn test_resolve_prefix() {
        let mut posts = open();
        let post = posts
            .add_post(PostDraft::new("T", "C", Author::new("A")))
            .unwrap();

        let resolved = resolve_post_id(&post.id[..8], &posts).unwrap();
        assert_eq!(resolved, post.id);
    }

    #[test]
    fn test_resolve_unknown() {
        let posts = open();
        assert!(resolve_post_id("zzz", &posts).is_err());
    }

    #[test]
    fn test_lookup_category_is_case_insensitive() {
        assert_eq!(lookup_category("Technology").unwrap().id, "technology");
        let err = lookup_category("gardening").unwrap_err().to_string();
        assert!(err.contains("Valid categories"));
    }

    #[test]
    fn test_build_patch_avatar_keeps_name() {
        let posts = open();
        let edits = PostEdits {
            avatar: Some("https://example.com/me.png".to_string()),
            ..PostEdits::default()
        };

        let patch = build_patch(&posts, "1", edits).unwrap();
        let author = patch.author.unwrap();
        assert_eq!(author.name, posts.get("1").unwrap().author.name);
        assert_eq!(author.avatar.as_deref(), Some("https://example.com/me.png"));
        assert!(patch.title.is_none());
    }

    #[test]
    fn test_build_patch_rejects_unknown_category() {
        let posts = open();
        let edits = PostEdits {
            category: Some("nope".to_string()),
            ..PostEdits::default()
        };
        assert!(build_patch(&posts, "1", edits).is_err());
    }

    #[test]
    fn test_edit_with_flags_updates_post() {
        let mut posts = open();
        let output = Output::new(crate::output::OutputFormat::Quiet);
        let edits = PostEdits {
            title: Some("Renamed".to_string()),
            ..PostEdits::default()
        };

        edit(&mut posts, "1".to_string(), edits, &output).unwrap();
        assert_eq!(posts.get("1").unwrap().title, "Renamed");
    }

    #[test]
    fn test_delete_in_quiet_mode_skips_prompt() {
        let mut posts = open();
        let output = Output::new(crate::output::OutputFormat::Quiet);

        delete(&mut posts, "2".to_string(), &output).unwrap();
        assert!(posts.get("2").is_none());
    }
}
