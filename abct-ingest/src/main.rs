//! abct-ingest - Load ABC tune books into the catalog database
//!
//! `abct-ingest load` (the default) parses `<books_dir>/<book_number>/*.abc`
//! and replaces the tune table in one transaction. `abct-ingest clear`
//! empties the table.

use abct_common::config::{self, LoadErrorPolicy, TomlConfig};
use abct_common::db::{clear_tunes, init_database};
use abct_ingest::reload_catalog;
use abct_ingest::services::CorpusLoader;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for abct-ingest
#[derive(Parser, Debug)]
#[command(name = "abct-ingest")]
#[command(about = "Load ABC tune books into the tune catalog")]
#[command(version)]
struct Args {
    /// Config file (defaults to the platform config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root folder holding the catalog database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Database file (overrides <root-folder>/abc_tunes.db)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Books directory laid out as <books-dir>/<book_number>/*.abc
    #[arg(short, long)]
    books_dir: Option<PathBuf>,

    /// Skip invalid book folders and unreadable files instead of aborting
    #[arg(long)]
    skip_unreadable: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Parse the books directory and replace the tune table (default)
    Load,
    /// Delete every tune from the table
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load config file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .init();

    info!(
        "Starting abct-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    config::ensure_root_folder(&root_folder)
        .with_context(|| format!("Failed to create root folder {}", root_folder.display()))?;

    let db_path =
        config::resolve_database_path(args.database.as_deref(), &root_folder, &toml_config);
    info!("Database: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to open database")?;

    match args.command.unwrap_or(Command::Load) {
        Command::Load => {
            let books_dir = config::resolve_books_dir(args.books_dir.as_deref(), &toml_config);
            let policy = if args.skip_unreadable {
                LoadErrorPolicy::Skip
            } else {
                toml_config.on_load_error
            };

            let loader = CorpusLoader::new().with_policy(policy);
            let summary = reload_catalog(&pool, &loader, &books_dir)
                .await
                .with_context(|| format!("Failed to load {}", books_dir.display()))?;

            println!(
                "Loaded {} tunes from {} files in {} books",
                summary.tunes_loaded, summary.files_parsed, summary.books
            );
            if summary.skipped > 0 {
                println!("Skipped {} entries (see log for details)", summary.skipped);
            }
        }
        Command::Clear => {
            let removed = clear_tunes(&pool).await.context("Failed to clear tunes")?;
            println!("Database cleared! ({} tunes removed)", removed);
        }
    }

    pool.close().await;
    Ok(())
}
