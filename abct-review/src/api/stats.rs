//! Aggregate views: books, rhythms, statistics, top values, completeness

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use abct_common::db::load_all_tunes;
use abct_common::query::{
    collection_stats, completeness_ratio, count_per_book, list_distinct_rhythms, top_n,
    CollectionStats,
};
use abct_common::TuneField;

use crate::error::ApiResult;
use crate::AppState;

/// Number of values returned by `/api/top/:field` when `n` is omitted
pub const DEFAULT_TOP_N: usize = 10;

/// A book and how many tunes it holds
#[derive(Debug, Serialize)]
pub struct BookSummary {
    pub book_number: i64,
    pub tune_count: usize,
}

/// GET /api/books
pub async fn list_books(State(state): State<AppState>) -> ApiResult<Json<Vec<BookSummary>>> {
    let rows = load_all_tunes(&state.db).await?;
    let books = count_per_book(&rows)
        .into_iter()
        .map(|(book_number, tune_count)| BookSummary {
            book_number,
            tune_count,
        })
        .collect();
    Ok(Json(books))
}

/// GET /api/rhythms
pub async fn list_rhythms(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let rows = load_all_tunes(&state.db).await?;
    Ok(Json(list_distinct_rhythms(&rows).into_iter().collect()))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<CollectionStats>> {
    let rows = load_all_tunes(&state.db).await?;
    Ok(Json(collection_stats(&rows)))
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_top_n")]
    pub n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct TopResponse {
    pub field: TuneField,
    pub values: Vec<ValueCount>,
}

/// GET /api/top/:field?n=
///
/// Unknown field names are rejected with 400.
pub async fn top_values(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Query(query): Query<TopQuery>,
) -> ApiResult<Json<TopResponse>> {
    let field: TuneField = field.parse()?;
    let rows = load_all_tunes(&state.db).await?;
    let values = top_n(&rows, field, query.n)
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    Ok(Json(TopResponse { field, values }))
}

#[derive(Debug, Serialize)]
pub struct CompletenessResponse {
    pub field: TuneField,
    pub total_tunes: usize,
    /// Fraction of tunes with a non-empty value, 0.0 to 1.0
    pub ratio: f64,
}

/// GET /api/completeness/:field
pub async fn field_completeness(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> ApiResult<Json<CompletenessResponse>> {
    let field: TuneField = field.parse()?;
    let rows = load_all_tunes(&state.db).await?;
    Ok(Json(CompletenessResponse {
        field,
        total_tunes: rows.len(),
        ratio: completeness_ratio(&rows, field),
    }))
}
