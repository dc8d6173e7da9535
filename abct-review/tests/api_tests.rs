//! Integration tests for abct-review API endpoints
//!
//! Each test seeds a fresh catalog in a temp dir, reopens it read-only and
//! drives the router with `oneshot`.

use abct_common::db::{connect_readonly, init_database, insert_tunes};
use abct_common::TuneRecord;
use abct_review::{build_router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

fn tune(reference: &str, title: &str, rhythm: &str, key: &str, book: i64) -> TuneRecord {
    let mut record = TuneRecord::new(reference);
    record.title = title.to_string();
    record.titles = vec![title.to_string()];
    record.rhythm = rhythm.to_string();
    record.key = key.to_string();
    record.book_number = book;
    record
}

/// Test helper: seed a catalog and build the app over a read-only pool
async fn setup_app(records: &[TuneRecord]) -> (TempDir, axum::Router) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("abc_tunes.db");

    let pool = init_database(&db_path).await.unwrap();
    insert_tunes(&pool, records).await.unwrap();
    pool.close().await;

    let readonly = connect_readonly(&db_path).await.unwrap();
    (dir, build_router(AppState::new(readonly)))
}

fn sample() -> Vec<TuneRecord> {
    vec![
        tune("1", "The Liffey", "reel", "Gmaj", 1),
        tune("2", "Cooley's", "jig", "Edor", 1),
        tune("3", "The Kesh", "Jig", "Gmaj", 2),
        tune("1", "Untitled", "", "", 3),
    ]
}

/// Test helper: GET `uri` and return status plus parsed JSON body
async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let json = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, json)
}

fn titles(json: &Value) -> Vec<String> {
    json["tunes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = setup_app(&[]).await;
    let (status, json) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "abct-review");
}

#[tokio::test]
async fn test_list_all_tunes_in_store_order() {
    let (_dir, app) = setup_app(&sample()).await;
    let (status, json) = get_json(app, "/api/tunes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_results"], 4);
    assert_eq!(json["page"], 1);
    assert_eq!(
        titles(&json),
        vec!["The Liffey", "Cooley's", "The Kesh", "Untitled"]
    );
    assert_eq!(json["tunes"][0]["key_signature"], "Gmaj");
    assert_eq!(json["tunes"][0]["book_number"], 1);
}

#[tokio::test]
async fn test_title_and_rhythm_filters() {
    let (_dir, app) = setup_app(&sample()).await;
    let (_, json) = get_json(app.clone(), "/api/tunes?title=THE").await;
    assert_eq!(titles(&json), vec!["The Liffey", "The Kesh"]);

    let (_, json) = get_json(app.clone(), "/api/tunes?rhythm=jig").await;
    assert_eq!(titles(&json), vec!["Cooley's", "The Kesh"]);

    let (_, json) = get_json(app, "/api/tunes?rhythm=jig&book=2").await;
    assert_eq!(titles(&json), vec!["The Kesh"]);
}

#[tokio::test]
async fn test_no_match_is_empty_not_error() {
    let (_dir, app) = setup_app(&sample()).await;
    let (status, json) = get_json(app, "/api/tunes?title=polka").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_results"], 0);
    assert!(json["tunes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_book_tunes() {
    let (_dir, app) = setup_app(&sample()).await;
    let (status, json) = get_json(app.clone(), "/api/books/1/tunes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&json), vec!["The Liffey", "Cooley's"]);

    let (status, json) = get_json(app, "/api/books/42/tunes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_results"], 0);
}

#[tokio::test]
async fn test_books_and_rhythms() {
    let (_dir, app) = setup_app(&sample()).await;
    let (_, books) = get_json(app.clone(), "/api/books").await;
    assert_eq!(
        books,
        serde_json::json!([
            { "book_number": 1, "tune_count": 2 },
            { "book_number": 2, "tune_count": 1 },
            { "book_number": 3, "tune_count": 1 },
        ])
    );

    let (_, rhythms) = get_json(app, "/api/rhythms").await;
    assert_eq!(rhythms, serde_json::json!(["Jig", "jig", "reel"]));
}

#[tokio::test]
async fn test_stats() {
    let (_dir, app) = setup_app(&sample()).await;
    let (status, json) = get_json(app, "/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_tunes"], 4);
    assert_eq!(json["total_books"], 3);
    assert_eq!(json["tunes_per_book"]["1"], 2);
    assert_eq!(json["rhythm_distribution"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_top_values() {
    let (_dir, app) = setup_app(&sample()).await;
    let (status, json) = get_json(app.clone(), "/api/top/key?n=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["field"], "key");
    assert_eq!(
        json["values"],
        serde_json::json!([{ "value": "Gmaj", "count": 2 }])
    );

    let (status, json) = get_json(app, "/api/top/notes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_completeness() {
    let (_dir, app) = setup_app(&sample()).await;
    let (status, json) = get_json(app, "/api/completeness/rhythm").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_tunes"], 4);
    assert_eq!(json["ratio"], 0.75);
}

#[tokio::test]
async fn test_empty_catalog() {
    let (_dir, app) = setup_app(&[]).await;
    let (_, json) = get_json(app.clone(), "/api/completeness/title").await;
    assert_eq!(json["ratio"], 0.0);

    let (_, json) = get_json(app, "/api/stats").await;
    assert_eq!(json["total_tunes"], 0);
}
