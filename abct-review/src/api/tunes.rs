//! Tune listing and search
//!
//! `GET /api/tunes` combines the title, rhythm and book filters; every filter
//! given must match. `GET /api/books/:book_number/tunes` lists one book.
//! Both are paginated and return an empty page (not 404) when nothing matches.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use abct_common::db::load_all_tunes;
use abct_common::query::{filter_by_book, matches_substring};
use abct_common::{TuneField, TuneRow};

use crate::error::ApiResult;
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;

/// Query parameters for the tune listing
#[derive(Debug, Default, Deserialize)]
pub struct TuneQuery {
    /// Case-insensitive title substring
    pub title: Option<String>,
    /// Case-insensitive rhythm substring
    pub rhythm: Option<String>,
    /// Exact book number
    pub book: Option<i64>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: usize,
}

/// Query parameters for a single book listing
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

/// One page of matching tunes
#[derive(Debug, Serialize)]
pub struct TuneListResponse {
    pub total_results: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub tunes: Vec<TuneRow>,
}

impl TuneListResponse {
    fn from_matches(matches: &[&TuneRow], requested_page: usize) -> Self {
        let pagination = calculate_pagination(matches.len(), requested_page);
        Self {
            total_results: matches.len(),
            page: pagination.page,
            page_size: PAGE_SIZE,
            total_pages: pagination.total_pages,
            tunes: pagination
                .slice(matches)
                .iter()
                .map(|row| (*row).clone())
                .collect(),
        }
    }
}

/// Apply every filter present in `query`, keeping store order
pub fn apply_filters<'a>(rows: &'a [TuneRow], query: &TuneQuery) -> Vec<&'a TuneRow> {
    let mut matches: Vec<&TuneRow> = match query.book {
        Some(book) => filter_by_book(rows, book),
        None => rows.iter().collect(),
    };
    if let Some(title) = &query.title {
        matches.retain(|row| matches_substring(row, TuneField::Title, title));
    }
    if let Some(rhythm) = &query.rhythm {
        matches.retain(|row| matches_substring(row, TuneField::Rhythm, rhythm));
    }
    matches
}

/// GET /api/tunes?title=&rhythm=&book=&page=
pub async fn list_tunes(
    State(state): State<AppState>,
    Query(query): Query<TuneQuery>,
) -> ApiResult<Json<TuneListResponse>> {
    let rows = load_all_tunes(&state.db).await?;
    let matches = apply_filters(&rows, &query);
    Ok(Json(TuneListResponse::from_matches(&matches, query.page)))
}

/// GET /api/books/:book_number/tunes?page=
pub async fn book_tunes(
    State(state): State<AppState>,
    Path(book_number): Path<i64>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<TuneListResponse>> {
    let rows = load_all_tunes(&state.db).await?;
    let matches = filter_by_book(&rows, book_number);
    Ok(Json(TuneListResponse::from_matches(&matches, query.page)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, title: &str, rhythm: &str, book: i64) -> TuneRow {
        TuneRow {
            id,
            title: title.to_string(),
            rhythm: rhythm.to_string(),
            book_number: book,
            ..TuneRow::default()
        }
    }

    fn ids(rows: &[&TuneRow]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let rows = vec![row(1, "A", "reel", 1), row(2, "B", "jig", 2)];
        assert_eq!(ids(&apply_filters(&rows, &TuneQuery::default())), vec![1, 2]);
    }

    #[test]
    fn test_filters_combine() {
        let rows = vec![
            row(1, "The Liffey", "reel", 1),
            row(2, "The Kesh", "jig", 1),
            row(3, "The Mason's Apron", "reel", 2),
        ];
        let query = TuneQuery {
            title: Some("the".to_string()),
            rhythm: Some("REEL".to_string()),
            book: Some(2),
            page: 1,
        };
        assert_eq!(ids(&apply_filters(&rows, &query)), vec![3]);
    }

    #[test]
    fn test_response_pages_matches() {
        let rows: Vec<TuneRow> = (1..=150).map(|i| row(i, "T", "", 1)).collect();
        let matches: Vec<&TuneRow> = rows.iter().collect();

        let resp = TuneListResponse::from_matches(&matches, 2);
        assert_eq!(resp.total_results, 150);
        assert_eq!(resp.total_pages, 2);
        assert_eq!(resp.tunes.len(), 50);
        assert_eq!(resp.tunes[0].id, 101);
    }
}
