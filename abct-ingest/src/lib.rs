//! abct-ingest library interface
//!
//! Parses ABC tune books into records and reloads the tune table.

pub mod error;
pub mod services;

pub use crate::error::{IngestError, IngestResult};

use crate::services::CorpusLoader;
use abct_common::db::replace_all_tunes;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Outcome of one reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadSummary {
    pub tunes_loaded: usize,
    pub files_parsed: usize,
    pub books: usize,
    pub skipped: usize,
}

/// Load every tune under `books_dir` and atomically replace the tune table
///
/// The table is untouched when loading fails.
pub async fn reload_catalog(
    pool: &SqlitePool,
    loader: &CorpusLoader,
    books_dir: &Path,
) -> IngestResult<ReloadSummary> {
    info!("Loading ABC files from {}", books_dir.display());
    let report = loader.load_all_with_report(books_dir)?;
    info!("Found {} tunes", report.tunes.len());

    let inserted = replace_all_tunes(pool, &report.tunes).await?;

    Ok(ReloadSummary {
        tunes_loaded: inserted,
        files_parsed: report.files_parsed,
        books: report.files_per_book.len(),
        skipped: report.skipped.len(),
    })
}
