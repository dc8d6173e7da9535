//! Error types for abct-ingest

use crate::services::corpus_loader::LoadError;
use thiserror::Error;

/// Reload error
#[derive(Debug, Error)]
pub enum IngestError {
    /// Books directory could not be loaded
    #[error("Load failed: {0}")]
    Load(#[from] LoadError),

    /// abct-common error (database, config)
    #[error("Common error: {0}")]
    Common(#[from] abct_common::Error),
}

/// Result type for reload operations
pub type IngestResult<T> = Result<T, IngestError>;
