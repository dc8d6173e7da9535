//! abct-review - Read-only views over the tune catalog
//!
//! Text subcommands print one view and exit. `serve` starts the HTTP API on
//! 127.0.0.1. The database is always opened read-only.

use abct_common::config::{self, TomlConfig};
use abct_common::db::{connect_readonly, load_all_tunes};
use abct_common::query::{
    collection_stats, completeness_ratio, count_per_book, filter_by_book,
    filter_by_rhythm_substring, list_book_numbers, list_distinct_rhythms,
    search_by_title_substring, top_n,
};
use abct_common::{TuneField, TuneRow};
use abct_review::api::stats::DEFAULT_TOP_N;
use abct_review::{build_router, render, AppState};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for abct-review
#[derive(Parser, Debug)]
#[command(name = "abct-review")]
#[command(about = "Browse and search the ABC tune catalog")]
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

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Listen port (overrides review_port from the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
    #[command(flatten)]
    View(View),
}

/// One-shot text views
#[derive(Subcommand, Debug)]
enum View {
    /// Show every tune
    List,
    /// Tunes whose title contains TERM (case-insensitive)
    Search { term: String },
    /// Tunes in one book; lists available books first
    Book { number: i64 },
    /// Tunes whose rhythm contains NEEDLE; lists available rhythms first
    Rhythm { needle: String },
    /// Book numbers with their tune counts
    Books,
    /// Distinct rhythms
    Rhythms,
    /// Totals, tunes per book and rhythm distribution
    Stats,
    /// Most common values of a field
    Top {
        field: TuneField,
        #[arg(short, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },
    /// Share of tunes with a non-empty value for a field
    Completeness { field: TuneField },
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
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting abct-review v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path =
        config::resolve_database_path(args.database.as_deref(), &root_folder, &toml_config);
    info!("Database path: {}", db_path.display());

    let pool = match connect_readonly(&db_path).await {
        Ok(pool) => {
            info!("Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e).context("Run abct-ingest load first");
        }
    };

    match args.command {
        Command::Serve { port } => serve(pool, port.unwrap_or(toml_config.review_port)).await,
        Command::View(view) => {
            let rows = load_all_tunes(&pool).await.context("Failed to read tunes")?;
            pool.close().await;
            print!("{}", render_view(view, &rows));
            Ok(())
        }
    }
}

async fn serve(pool: SqlitePool, port: u16) -> Result<()> {
    let app = build_router(AppState::new(pool));

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("abct-review listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn render_view(view: View, rows: &[TuneRow]) -> String {
    match view {
        View::List => {
            let all: Vec<&TuneRow> = rows.iter().collect();
            render::tune_list(&all)
        }
        View::Search { term } => render::tune_list(&search_by_title_substring(rows, &term)),
        View::Book { number } => {
            let mut text = render::book_numbers(&list_book_numbers(rows));
            text.push('\n');
            text.push_str(&render::tune_list(&filter_by_book(rows, number)));
            text
        }
        View::Rhythm { needle } => {
            let mut text = render::rhythms(&list_distinct_rhythms(rows));
            text.push('\n');
            text.push_str(&render::tune_list(&filter_by_rhythm_substring(
                rows, &needle,
            )));
            text
        }
        View::Books => render::book_counts(&count_per_book(rows)),
        View::Rhythms => render::rhythms(&list_distinct_rhythms(rows)),
        View::Stats => render::stats(&collection_stats(rows)),
        View::Top { field, n } => render::top_values(field, &top_n(rows, field, n)),
        View::Completeness { field } => {
            render::completeness(field, completeness_ratio(rows, field), rows.len())
        }
    }
}
