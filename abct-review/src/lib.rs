//! abct-review library - read-only views over the tune catalog
//!
//! Every request takes a fresh snapshot of the `tunes` table and runs the
//! query functions from `abct_common::query` over it.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod pagination;
pub mod render;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only)
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/tunes", get(api::list_tunes))
        .route("/api/books", get(api::list_books))
        .route("/api/books/:book_number/tunes", get(api::book_tunes))
        .route("/api/rhythms", get(api::list_rhythms))
        .route("/api/stats", get(api::get_stats))
        .route("/api/top/:field", get(api::top_values))
        .route("/api/completeness/:field", get(api::field_completeness))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
