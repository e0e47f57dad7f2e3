//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use inkwell_core::{BackupInfo, Category, Post};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single post in full
    pub fn print_post(&self, post: &Post) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", post.id);
                println!("Title:    {}", post.title);
                match post.author.avatar {
                    Some(ref avatar) => println!("Author:   {} ({})", post.author.name, avatar),
                    None => println!("Author:   {}", post.author.name),
                }
                println!("Created:  {}", post.created_at.format("%Y-%m-%d"));
                if let Some(ref category) = post.category {
                    println!("Category: {} {}", category.icon, category.name);
                }
                if let Some(ref image) = post.image {
                    println!("Image:    {}", truncate(image, 70));
                }
                println!("Excerpt:  {}", post.excerpt);
                println!();
                println!("{}", post.content);
            }
            OutputFormat::Json => print_json(post),
            OutputFormat::Quiet => {
                println!("{}", post.id);
            }
        }
    }

    /// Print a list of posts
    pub fn print_posts<'a>(&self, posts: impl IntoIterator<Item = &'a Post>) {
        let posts: Vec<&Post> = posts.into_iter().collect();
        match self.format {
            OutputFormat::Human => {
                if posts.is_empty() {
                    println!("No posts found.");
                    return;
                }
                for post in &posts {
                    let category = post
                        .category
                        .as_ref()
                        .map(|c| c.name.as_str())
                        .unwrap_or("-");
                    println!(
                        "{} | {} | {} | {} | {}",
                        short_id(&post.id),
                        post.created_at.format("%Y-%m-%d"),
                        truncate(&post.title, 40),
                        truncate(&post.author.name, 18),
                        category
                    );
                }
                println!("\n{} post(s)", posts.len());
            }
            OutputFormat::Json => print_json(&posts),
            OutputFormat::Quiet => {
                for post in &posts {
                    println!("{}", post.id);
                }
            }
        }
    }

    /// Print the category catalog with per-category post counts
    pub fn print_categories(&self, categories: &[(Category, usize)]) {
        match self.format {
            OutputFormat::Human => {
                for (category, count) in categories {
                    println!(
                        "{} {:<14} {:<16} {:>3}  {}",
                        category.icon, category.id, category.name, count, category.description
                    );
                }
            }
            OutputFormat::Json => {
                let json: Vec<_> = categories
                    .iter()
                    .map(|(category, count)| {
                        serde_json::json!({
                            "id": category.id,
                            "name": category.name,
                            "color": category.color,
                            "icon": category.icon,
                            "description": category.description,
                            "count": count
                        })
                    })
                    .collect();
                print_json(&json);
            }
            OutputFormat::Quiet => {
                for (category, _) in categories {
                    println!("{}", category.id);
                }
            }
        }
    }

    /// Print a list of backups
    pub fn print_backups(&self, backups: &[BackupInfo]) {
        match self.format {
            OutputFormat::Human => {
                if backups.is_empty() {
                    println!("No backups found.");
                    return;
                }
                for backup in backups {
                    let count = backup
                        .count
                        .map(|c| format!("{} post(s)", c))
                        .unwrap_or_else(|| "unreadable".to_string());
                    println!("{}  {}", backup.timestamp, count);
                }
                println!("\n{} backup(s)", backups.len());
            }
            OutputFormat::Json => print_json(&backups),
            OutputFormat::Quiet => {
                for backup in backups {
                    println!("{}", backup.key);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// First 8 characters of an id
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((cut, _)) => &id[..cut],
        None => id,
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
