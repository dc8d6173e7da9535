//! Ingest services
//!
//! - `abc_parser`: one file's lines → tune records
//! - `corpus_loader`: books directory → all tune records

pub mod abc_parser;
pub mod corpus_loader;

pub use abc_parser::{parse_abc_file, parse_abc_lines, parse_abc_str};
pub use corpus_loader::{CorpusLoader, CorpusReport, LoadError, SkippedEntry};
