//! Tune table operations
//!
//! The catalog's only write pattern is "clear, then bulk insert". Absent text
//! fields are stored as empty strings and `key` is stored as `key_signature`.

use crate::tune::{TuneRecord, TuneRow};
use crate::Result;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

/// Create the tunes table if it doesn't exist
pub async fn create_tunes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tunes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reference TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL DEFAULT '',
            meter TEXT NOT NULL DEFAULT '',
            length TEXT NOT NULL DEFAULT '',
            key_signature TEXT NOT NULL DEFAULT '',
            rhythm TEXT NOT NULL DEFAULT '',
            composer TEXT NOT NULL DEFAULT '',
            source TEXT NOT NULL DEFAULT '',
            tempo TEXT NOT NULL DEFAULT '',
            z_id TEXT NOT NULL DEFAULT '',
            book_ref TEXT NOT NULL DEFAULT '',
            book_number INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tunes_book_number ON tunes(book_number)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete every tune; returns the number of rows removed
pub async fn clear_tunes(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM tunes").execute(pool).await?;
    info!("Cleared {} tunes", result.rows_affected());
    Ok(result.rows_affected())
}

/// Insert all records in one transaction; returns the number inserted
pub async fn insert_tunes(pool: &SqlitePool, tunes: &[TuneRecord]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    for tune in tunes {
        insert_tune(&mut tx, tune).await?;
    }
    tx.commit().await?;

    debug!("Inserted {} tunes", tunes.len());
    Ok(tunes.len())
}

/// Replace the whole table with `tunes` atomically
///
/// Clear and insert share one transaction, so readers see either the old
/// table or the fully reloaded one.
pub async fn replace_all_tunes(pool: &SqlitePool, tunes: &[TuneRecord]) -> Result<usize> {
    let mut tx = pool.begin().await?;

    let cleared = sqlx::query("DELETE FROM tunes")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for tune in tunes {
        insert_tune(&mut tx, tune).await?;
    }
    tx.commit().await?;

    info!("Replaced {} tunes with {} tunes", cleared, tunes.len());
    Ok(tunes.len())
}

async fn insert_tune(conn: &mut SqliteConnection, tune: &TuneRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tunes (reference, title, meter, length, key_signature, rhythm,
                           composer, source, tempo, z_id, book_ref, book_number)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&tune.reference)
    .bind(&tune.title)
    .bind(&tune.meter)
    .bind(&tune.length)
    .bind(&tune.key)
    .bind(&tune.rhythm)
    .bind(&tune.composer)
    .bind(&tune.source)
    .bind(&tune.tempo)
    .bind(&tune.z_id)
    .bind(&tune.book_ref)
    .bind(tune.book_number)
    .execute(conn)
    .await?;

    Ok(())
}

/// Load every stored tune in insertion order
pub async fn load_all_tunes(pool: &SqlitePool) -> Result<Vec<TuneRow>> {
    let rows = sqlx::query(
        r#"
        SELECT id, reference, title, meter, length, key_signature, rhythm,
               composer, source, tempo, z_id, book_ref, book_number
        FROM tunes
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TuneRow {
            id: row.get("id"),
            reference: row.get("reference"),
            title: row.get("title"),
            meter: row.get("meter"),
            length: row.get("length"),
            key_signature: row.get("key_signature"),
            rhythm: row.get("rhythm"),
            composer: row.get("composer"),
            source: row.get("source"),
            tempo: row.get("tempo"),
            z_id: row.get("z_id"),
            book_ref: row.get("book_ref"),
            book_number: row.get("book_number"),
        })
        .collect())
}

/// Number of stored tunes
pub async fn count_tunes(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tunes")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
