//! Data management command handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use inkwell_core::{ExportFile, KeyValueStore, Synchronizer};

use crate::editor::confirm;
use crate::output::{Output, OutputFormat};

/// Export all posts to `blog-data-<date>.json` in `dir` (default: current directory)
pub fn export<S: KeyValueStore>(
    posts: &Synchronizer<S>,
    dir: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let file = posts.export_data().context("Failed to export data")?;
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let path = write_export(&file, &dir)?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "path": path,
                    "mime_type": file.mime_type,
                    "bytes": file.bytes.len(),
                    "count": posts.posts().len()
                })
            );
        }
        OutputFormat::Quiet => println!("{}", path.display()),
        OutputFormat::Human => output.success(&format!(
            "Exported {} post(s) to {}",
            posts.posts().len(),
            path.display()
        )),
    }

    Ok(())
}

/// Replace the collection with the posts in `file`
pub fn import<S: KeyValueStore>(
    posts: &mut Synchronizer<S>,
    file: PathBuf,
    output: &Output,
) -> Result<()> {
    let text = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;

    let count = posts
        .import_data(&text)
        .with_context(|| format!("Invalid file format: {}", file.display()))?;

    output.success(&format!("Imported {} post(s)", count));
    Ok(())
}

/// Store a timestamped backup of the collection
pub fn backup<S: KeyValueStore>(posts: &Synchronizer<S>, output: &Output) -> Result<()> {
    let info = posts.create_backup().context("Failed to create backup")?;

    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!(info)),
        OutputFormat::Quiet => println!("{}", info.key),
        OutputFormat::Human => output.success(&format!(
            "Backup created: {} ({} post(s))",
            info.timestamp,
            info.count.unwrap_or(0)
        )),
    }

    Ok(())
}

/// List stored backups
pub fn backups<S: KeyValueStore>(posts: &Synchronizer<S>, output: &Output) -> Result<()> {
    let backups = posts.list_backups().context("Failed to list backups")?;
    output.print_backups(&backups);
    Ok(())
}

/// Write the collection to storage
pub fn save<S: KeyValueStore>(posts: &Synchronizer<S>, output: &Output) -> Result<()> {
    posts.save().context("Failed to save data")?;
    output.success("Data saved successfully");
    Ok(())
}

/// Re-read the collection from storage
pub fn reload<S: KeyValueStore>(posts: &mut Synchronizer<S>, output: &Output) -> Result<()> {
    posts.reload().context("Failed to reload data")?;
    output.success(&format!(
        "Data reloaded successfully ({} post(s))",
        posts.posts().len()
    ));
    Ok(())
}

/// Remove the stored collection and start over from the seed posts
pub fn reset<S: KeyValueStore>(posts: &mut Synchronizer<S>, output: &Output) -> Result<()> {
    if output.should_prompt() {
        println!(
            "This removes all {} post(s) and restores the example posts.",
            posts.posts().len()
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    posts
        .repository()
        .clear()
        .context("Failed to clear stored posts")?;
    posts.reload().context("Failed to reload data")?;

    output.success(&format!(
        "Data reset ({} example post(s))",
        posts.posts().len()
    ));
    Ok(())
}

/// Write an export file into `dir`, creating the directory if needed
fn write_export(file: &ExportFile, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(&file.filename);
    fs::write(&path, &file.bytes)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    Ok(path)
}
