//! # ABC Tune Catalog Common Library
//!
//! Shared code for the catalog binaries including:
//! - Tune record and persisted row types
//! - Query engine (filters, search, grouping, statistics)
//! - SQLite storage of the tune table
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod query;
pub mod tune;

pub use error::{Error, Result};
pub use tune::{TuneField, TuneRecord, TuneRow};
