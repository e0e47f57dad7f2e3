//! Inkwell CLI
//!
//! Command-line interface for Inkwell - a local blog post store.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use inkwell_core::{Config, FileStore, Synchronizer};

mod commands;
mod editor;
mod output;

use commands::post::{NewPost, PostEdits};
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "inkwell")]
#[command(about = "Inkwell - Local blog post store")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage posts
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },
    /// Export, import, back up and reset stored data
    Data {
        #[command(subcommand)]
        command: DataCommands,
    },
    /// List categories with post counts
    Categories,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show storage status
    Status,
}

#[derive(Subcommand)]
enum PostCommands {
    /// Create a new post
    #[command(alias = "create")]
    Add {
        /// Post title
        #[arg(short = 'T', long)]
        title: String,
        /// Author name
        #[arg(short, long)]
        author: String,
        /// Post content (opens editor if not provided)
        #[arg(short, long)]
        content: Option<String>,
        /// Author avatar URL
        #[arg(long)]
        avatar: Option<String>,
        /// Cover image URL (a default image is picked if omitted)
        #[arg(short, long)]
        image: Option<String>,
        /// Category id
        #[arg(short = 'g', long)]
        category: Option<String>,
    },
    /// List all posts, newest first
    #[command(alias = "ls")]
    List {
        /// Filter by category id
        #[arg(short = 'g', long)]
        category: Option<String>,
    },
    /// Show a post
    Show {
        /// Post ID (full or prefix)
        id: String,
    },
    /// Edit a post (interactive when no fields are given)
    Edit {
        /// Post ID (full or prefix)
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short, long)]
        author: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(short, long)]
        excerpt: Option<String>,
        #[arg(short, long)]
        image: Option<String>,
        #[arg(short = 'g', long)]
        category: Option<String>,
    },
    /// Delete a post
    #[command(alias = "rm")]
    Delete {
        /// Post ID (full or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum DataCommands {
    /// Export all posts to a JSON file
    Export {
        /// Directory to write the export into
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Replace all posts with the contents of an export file
    Import {
        /// Export file to read
        file: PathBuf,
    },
    /// Store a timestamped backup
    Backup,
    /// List stored backups
    Backups,
    /// Write the current posts to storage
    Save,
    /// Re-read posts from storage
    Reload,
    /// Remove all posts and restore the example posts
    Reset,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, quota_bytes, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let mut posts = Synchronizer::open(FileStore::from_config(&config));

    let result = match cli.command {
        Commands::Post { command } => handle_post_command(command, &mut posts, &output),
        Commands::Data { command } => handle_data_command(command, &mut posts, &output),
        Commands::Categories => commands::category::list(&posts, &output),
        Commands::Status => commands::status::show(&posts, &config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    posts.shutdown();

    result
}

fn handle_post_command(
    command: PostCommands,
    posts: &mut Synchronizer<FileStore>,
    output: &Output,
) -> Result<()> {
    match command {
        PostCommands::Add {
            title,
            author,
            content,
            avatar,
            image,
            category,
        } => commands::post::add(
            posts,
            NewPost {
                title,
                content,
                author,
                avatar,
                image,
                category,
            },
            output,
        ),
        PostCommands::List { category } => commands::post::list(posts, category, output),
        PostCommands::Show { id } => commands::post::show(posts, id, output),
        PostCommands::Edit {
            id,
            title,
            content,
            author,
            avatar,
            excerpt,
            image,
            category,
        } => commands::post::edit(
            posts,
            id,
            PostEdits {
                title,
                content,
                author,
                avatar,
                excerpt,
                image,
                category,
            },
            output,
        ),
        PostCommands::Delete { id } => commands::post::delete(posts, id, output),
    }
}

fn handle_data_command(
    command: DataCommands,
    posts: &mut Synchronizer<FileStore>,
    output: &Output,
) -> Result<()> {
    match command {
        DataCommands::Export { output: dir } => commands::data::export(posts, dir, output),
        DataCommands::Import { file } => commands::data::import(posts, file, output),
        DataCommands::Backup => commands::data::backup(posts, output),
        DataCommands::Backups => commands::data::backups(posts, output),
        DataCommands::Save => commands::data::save(posts, output),
        DataCommands::Reload => commands::data::reload(posts, output),
        DataCommands::Reset => commands::data::reset(posts, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if INKWELL_LOG environment variable is set.
/// Appends to config.log_file or {data_dir}/debug.log.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("INKWELL_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "inkwell_core={},inkwell_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
