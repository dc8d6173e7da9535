//! Plain-text rendering for the command-line views
//!
//! Each function returns the full text so callers decide where it goes.

use abct_common::query::CollectionStats;
use abct_common::{TuneField, TuneRow};
use std::collections::{BTreeMap, BTreeSet};

const TUNE_SEPARATOR_WIDTH: usize = 40;
const BANNER_WIDTH: usize = 50;

/// Detailed listing of tunes, or `No tunes found!` when empty
pub fn tune_list(rows: &[&TuneRow]) -> String {
    if rows.is_empty() {
        return "No tunes found!\n".to_string();
    }

    let mut lines = vec![format!("Found {} tune(s):", rows.len()), String::new()];
    for row in rows {
        lines.push(format!("ID: {}", row.id));
        lines.push(format!("  Title: {}", row.title));
        lines.push(format!("  Reference: {}", row.reference));
        lines.push(format!("  Key: {}", row.key_signature));
        lines.push(format!("  Meter: {}", row.meter));
        lines.push(format!("  Rhythm: {}", row.rhythm));
        if !row.composer.is_empty() {
            lines.push(format!("  Composer: {}", row.composer));
        }
        if !row.source.is_empty() {
            lines.push(format!("  Source: {}", row.source));
        }
        lines.push(format!("  Book: {}", row.book_number));
        lines.push("-".repeat(TUNE_SEPARATOR_WIDTH));
    }
    finish(lines)
}

/// `Available books: [1, 2, 7]`
pub fn book_numbers(books: &BTreeSet<i64>) -> String {
    let list: Vec<String> = books.iter().map(i64::to_string).collect();
    format!("Available books: [{}]\n", list.join(", "))
}

/// Available rhythms, one per line
pub fn rhythms(rhythms: &BTreeSet<String>) -> String {
    let mut lines = vec!["Available rhythms:".to_string()];
    lines.extend(rhythms.iter().map(|r| format!("  - {}", r)));
    finish(lines)
}

/// Per-book tune counts
pub fn book_counts(counts: &BTreeMap<i64, usize>) -> String {
    let mut lines = vec!["Tunes per book:".to_string()];
    lines.extend(
        counts
            .iter()
            .map(|(book, count)| format!("  Book {}: {} tunes", book, count)),
    );
    finish(lines)
}

/// Statistics screen: totals, tunes per book, rhythm distribution
pub fn stats(stats: &CollectionStats) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut lines = vec![
        banner.clone(),
        "DATABASE STATISTICS".to_string(),
        banner,
        format!("Total tunes: {}", stats.total_tunes),
        format!("Total books: {}", stats.total_books),
        String::new(),
        "Tunes per book:".to_string(),
    ];
    lines.extend(
        stats
            .tunes_per_book
            .iter()
            .map(|(book, count)| format!("  Book {}: {} tunes", book, count)),
    );
    lines.push(String::new());
    lines.push("Rhythm distribution:".to_string());
    lines.extend(
        stats
            .rhythm_distribution
            .iter()
            .map(|(rhythm, count)| format!("  {}: {} tunes", rhythm, count)),
    );
    finish(lines)
}

/// Ranked value counts for one field
pub fn top_values(field: TuneField, values: &[(String, usize)]) -> String {
    if values.is_empty() {
        return format!("No {} values recorded\n", field);
    }
    let mut lines = vec![format!("Most common {} values:", field)];
    lines.extend(
        values
            .iter()
            .enumerate()
            .map(|(i, (value, count))| format!("  {:>2}. {}: {}", i + 1, value, count)),
    );
    finish(lines)
}

/// `rhythm: 80.0% filled (4 of 5 tunes)`
pub fn completeness(field: TuneField, ratio: f64, total: usize) -> String {
    let filled = (ratio * total as f64).round() as usize;
    format!(
        "{}: {:.1}% filled ({} of {} tunes)\n",
        field,
        ratio * 100.0,
        filled,
        total
    )
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
