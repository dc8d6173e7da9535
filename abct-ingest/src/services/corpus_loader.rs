//! Tune book corpus loader
//!
//! Walks a books directory laid out as `<root>/<book_number>/*.abc`, parses
//! every matching file and concatenates the results. Book folders and the
//! files inside them are visited in file-name order so a given directory
//! listing always produces the same sequence.

use crate::services::abc_parser::parse_abc_file;
use abct_common::config::LoadErrorPolicy;
use abct_common::TuneRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extension of ABC tune books
pub const ABC_EXTENSION: &str = "abc";

/// Corpus loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// Books directory does not exist
    #[error("Books directory not found: {0}")]
    RootNotFound(PathBuf),

    /// Books directory path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Folder under the books directory whose name is not a book number
    #[error("Book folder name '{name}' is not a book number: {path}")]
    InvalidBookFolder { path: PathBuf, name: String },

    /// Folder or file could not be read
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Path the error refers to
    pub fn path(&self) -> &Path {
        match self {
            LoadError::RootNotFound(path) | LoadError::NotADirectory(path) => path,
            LoadError::InvalidBookFolder { path, .. } | LoadError::Io { path, .. } => path,
        }
    }
}

/// Entry left out of the corpus under [`LoadErrorPolicy::Skip`]
#[derive(Debug, Clone)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Load result with statistics
#[derive(Debug, Clone, Default)]
pub struct CorpusReport {
    /// Every tune found, in load order
    pub tunes: Vec<TuneRecord>,
    /// Count of parsed files per book number
    pub files_per_book: BTreeMap<i64, usize>,
    /// Total files parsed
    pub files_parsed: usize,
    /// Entries skipped because of errors
    pub skipped: Vec<SkippedEntry>,
}

/// Loader for a books directory
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    policy: LoadErrorPolicy,
    extension: String,
}

impl CorpusLoader {
    /// Loader for `.abc` files that aborts on the first error
    pub fn new() -> Self {
        Self {
            policy: LoadErrorPolicy::Abort,
            extension: ABC_EXTENSION.to_string(),
        }
    }

    /// Set how invalid book folders and unreadable entries are handled
    pub fn with_policy(mut self, policy: LoadErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the tune file extension (without the dot)
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Load every tune under `root`
    pub fn load_all(&self, root: &Path) -> Result<Vec<TuneRecord>, LoadError> {
        Ok(self.load_all_with_report(root)?.tunes)
    }

    /// Load every tune under `root`, keeping per-book statistics
    pub fn load_all_with_report(&self, root: &Path) -> Result<CorpusReport, LoadError> {
        if !root.exists() {
            return Err(LoadError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(LoadError::NotADirectory(root.to_path_buf()));
        }

        let mut report = CorpusReport::default();

        for entry in sorted_children(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.handle(walk_error(e, root), &mut report)?;
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(book_number) = parse_book_number(&name) else {
                let err = LoadError::InvalidBookFolder {
                    path: entry.path().to_path_buf(),
                    name,
                };
                self.handle(err, &mut report)?;
                continue;
            };

            self.load_book(entry.path(), book_number, &mut report)?;
        }

        info!(
            "Loaded {} tunes from {} files in {} books ({} skipped)",
            report.tunes.len(),
            report.files_parsed,
            report.files_per_book.len(),
            report.skipped.len()
        );

        Ok(report)
    }

    fn load_book(
        &self,
        book_path: &Path,
        book_number: i64,
        report: &mut CorpusReport,
    ) -> Result<(), LoadError> {
        debug!("Loading book {} from {}", book_number, book_path.display());

        for entry in sorted_children(book_path) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.handle(walk_error(e, book_path), report)?;
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.has_tune_extension(entry.path()) {
                continue;
            }

            match parse_abc_file(entry.path(), book_number) {
                Ok(tunes) => {
                    debug!("{}: {} tunes", entry.path().display(), tunes.len());
                    report.tunes.extend(tunes);
                    report.files_parsed += 1;
                    *report.files_per_book.entry(book_number).or_insert(0) += 1;
                }
                Err(e) => self.handle(e, report)?,
            }
        }

        Ok(())
    }

    /// Apply the configured policy: abort with `err`, or record it and continue
    fn handle(&self, err: LoadError, report: &mut CorpusReport) -> Result<(), LoadError> {
        match self.policy {
            LoadErrorPolicy::Abort => Err(err),
            LoadErrorPolicy::Skip => {
                warn!("Skipping {}: {}", err.path().display(), err);
                report.skipped.push(SkippedEntry {
                    path: err.path().to_path_buf(),
                    reason: err.to_string(),
                });
                Ok(())
            }
        }
    }

    fn has_tune_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext == self.extension.as_str())
            .unwrap_or(false)
    }
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Immediate children of `dir`, sorted by file name, following symlinks
fn sorted_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
}

fn walk_error(err: walkdir::Error, fallback: &Path) -> LoadError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| fallback.to_path_buf());
    LoadError::Io {
        path,
        source: err.into(),
    }
}

/// Book number from a folder name: base-10 digits only
pub fn parse_book_number(name: &str) -> Option<i64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}
