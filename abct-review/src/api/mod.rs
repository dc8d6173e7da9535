//! HTTP API handlers for abct-review

pub mod buildinfo;
pub mod health;
pub mod stats;
pub mod tunes;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use stats::{field_completeness, get_stats, list_books, list_rhythms, top_values};
pub use tunes::{book_tunes, list_tunes};
