//! Status command handler

use anyhow::{Context, Result};

use inkwell_core::data::format_bytes;
use inkwell_core::{Config, KeyValueStore, Synchronizer};

use crate::output::{Output, OutputFormat};

/// Show storage status
pub fn show<S: KeyValueStore>(
    posts: &Synchronizer<S>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let stats = posts.stats().context("Failed to read storage statistics")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "location": config.store_dir(),
                    "quota_bytes": config.quota(),
                    "storage": {
                        "size_bytes": stats.size_bytes,
                        "size": stats.size_human(),
                        "total_bytes": stats.total_bytes,
                        "backups": stats.backup_count
                    },
                    "counts": {
                        "posts": stats.post_count
                    },
                    "taken_at": stats.taken_at
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", stats.post_count);
        }
        OutputFormat::Human => {
            println!("Inkwell Status");
            println!("==============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.store_dir().display());
            println!("  Posts:    {}", stats.size_human());
            println!("  Total:    {}", format_bytes(stats.total_bytes));
            match config.quota() {
                Some(quota) => println!("  Quota:    {}", format_bytes(quota)),
                None => println!("  Quota:    unlimited"),
            }
            println!();
            println!("Contents:");
            println!("  Posts:   {}", stats.post_count);
            println!("  Backups: {}", stats.backup_count);
            println!();
            println!("Last updated: {}", stats.taken_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }

    Ok(())
}
