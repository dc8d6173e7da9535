//! Query engine over a loaded tune collection
//!
//! Every function takes an immutable snapshot (`&[TuneRow]`) and never mutates
//! it. Filters return borrowed rows in input order. An empty result is a normal
//! outcome, not an error.

use crate::tune::{TuneField, TuneRow};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Rows belonging to one book
pub fn filter_by_book(rows: &[TuneRow], book_number: i64) -> Vec<&TuneRow> {
    rows.iter().filter(|r| r.book_number == book_number).collect()
}

/// Rows whose rhythm contains `needle`, ignoring case
///
/// An empty rhythm never matches a non-empty needle.
pub fn filter_by_rhythm_substring<'a>(rows: &'a [TuneRow], needle: &str) -> Vec<&'a TuneRow> {
    filter_by_substring(rows, TuneField::Rhythm, needle)
}

/// Rows whose title contains `needle`, ignoring case
///
/// An empty needle returns the whole collection in order.
pub fn search_by_title_substring<'a>(rows: &'a [TuneRow], needle: &str) -> Vec<&'a TuneRow> {
    filter_by_substring(rows, TuneField::Title, needle)
}

/// Rows whose `field` contains `needle`, ignoring case
pub fn filter_by_substring<'a>(
    rows: &'a [TuneRow],
    field: TuneField,
    needle: &str,
) -> Vec<&'a TuneRow> {
    rows.iter()
        .filter(|r| matches_substring(r, field, needle))
        .collect()
}

/// Whether `row`'s `field` contains `needle`, ignoring case
pub fn matches_substring(row: &TuneRow, field: TuneField, needle: &str) -> bool {
    row.field(field)
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

/// Book numbers present in the collection, ascending
pub fn list_book_numbers(rows: &[TuneRow]) -> BTreeSet<i64> {
    rows.iter().map(|r| r.book_number).collect()
}

/// Number of tunes per book; every present book maps to a count of at least 1
pub fn count_per_book(rows: &[TuneRow]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.book_number).or_insert(0) += 1;
    }
    counts
}

/// Distinct non-empty rhythms, sorted
pub fn list_distinct_rhythms(rows: &[TuneRow]) -> BTreeSet<String> {
    rows.iter()
        .map(|r| r.rhythm.as_str())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Most frequent non-empty values of `field`
///
/// Sorted by descending count; equal counts keep first-encountered order.
pub fn top_n(rows: &[TuneRow], field: TuneField, n: usize) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<(&str, usize)> = Vec::new();

    for row in rows {
        let value = row.field(field);
        if value.is_empty() {
            continue;
        }
        match index.get(value) {
            Some(&i) => tallies[i].1 += 1,
            None => {
                index.insert(value, tallies.len());
                tallies.push((value, 1));
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    tallies.sort_by(|a, b| b.1.cmp(&a.1));
    tallies
        .into_iter()
        .take(n)
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

/// Fraction of rows where `field` is non-empty; 0.0 for an empty collection
pub fn completeness_ratio(rows: &[TuneRow], field: TuneField) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let filled = rows.iter().filter(|r| !r.field(field).is_empty()).count();
    filled as f64 / rows.len() as f64
}

/// Summary shown on the statistics screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    pub total_tunes: usize,
    pub total_books: usize,
    pub tunes_per_book: BTreeMap<i64, usize>,
    /// (rhythm, count), most common first
    pub rhythm_distribution: Vec<(String, usize)>,
}

/// Totals, per-book counts and rhythm distribution in one pass over the snapshot
pub fn collection_stats(rows: &[TuneRow]) -> CollectionStats {
    let tunes_per_book = count_per_book(rows);
    CollectionStats {
        total_tunes: rows.len(),
        total_books: tunes_per_book.len(),
        tunes_per_book,
        rhythm_distribution: top_n(rows, TuneField::Rhythm, usize::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, title: &str, rhythm: &str, key: &str, book: i64) -> TuneRow {
        TuneRow {
            id,
            reference: id.to_string(),
            title: title.to_string(),
            rhythm: rhythm.to_string(),
            key_signature: key.to_string(),
            book_number: book,
            ..TuneRow::default()
        }
    }

    fn sample() -> Vec<TuneRow> {
        vec![
            row(1, "The Liffey", "reel", "Gmaj", 1),
            row(2, "Cooley's", "jig", "Edor", 1),
            row(3, "The Kesh", "Jig", "Gmaj", 1),
            row(4, "Drowsy Maggie", "reel", "Edor", 2),
            row(5, "Untitled", "", "", 2),
        ]
    }

    fn ids(rows: &[&TuneRow]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_filter_by_book() {
        let rows = sample();
        assert_eq!(ids(&filter_by_book(&rows, 2)), vec![4, 5]);
        assert!(filter_by_book(&rows, 9).is_empty());
    }

    #[test]
    fn test_rhythm_filter_is_case_insensitive() {
        let rows = sample();
        assert_eq!(ids(&filter_by_rhythm_substring(&rows, "JIG")), vec![2, 3]);
        assert_eq!(ids(&filter_by_rhythm_substring(&rows, "ee")), vec![1, 4]);
    }

    #[test]
    fn test_empty_rhythm_never_matches_non_empty_needle() {
        let rows = sample();
        let hits = filter_by_rhythm_substring(&rows, "r");
        assert!(hits.iter().all(|r| !r.rhythm.is_empty()));
    }

    #[test]
    fn test_title_search_with_empty_needle_returns_everything_in_order() {
        let rows = sample();
        assert_eq!(ids(&search_by_title_substring(&rows, "")), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_title_search_substring() {
        let rows = sample();
        assert_eq!(ids(&search_by_title_substring(&rows, "the ")), vec![1, 3]);
        assert!(search_by_title_substring(&rows, "polka").is_empty());
    }

    #[test]
    fn test_list_book_numbers_sorted() {
        let mut rows = sample();
        rows.insert(0, row(6, "Late", "", "", 7));
        let books: Vec<i64> = list_book_numbers(&rows).into_iter().collect();
        assert_eq!(books, vec![1, 2, 7]);
    }

    #[test]
    fn test_count_per_book() {
        let rows = sample();
        let counts = count_per_book(&rows);
        assert_eq!(counts, BTreeMap::from([(1, 3), (2, 2)]));
    }

    #[test]
    fn test_distinct_rhythms_exclude_empty() {
        let rows = sample();
        let rhythms: Vec<String> = list_distinct_rhythms(&rows).into_iter().collect();
        assert_eq!(rhythms, vec!["Jig", "jig", "reel"]);
    }

    #[test]
    fn test_top_n_orders_by_count_then_first_seen() {
        let rows = sample();
        let top = top_n(&rows, TuneField::Key, 10);
        // Gmaj and Edor both appear twice; Gmaj was seen first
        assert_eq!(
            top,
            vec![("Gmaj".to_string(), 2), ("Edor".to_string(), 2)]
        );

        let top = top_n(&rows, TuneField::Rhythm, 1);
        assert_eq!(top, vec![("reel".to_string(), 2)]);
    }

    #[test]
    fn test_top_n_zero_and_empty() {
        assert!(top_n(&sample(), TuneField::Rhythm, 0).is_empty());
        assert!(top_n(&[], TuneField::Rhythm, 5).is_empty());
    }

    #[test]
    fn test_completeness_ratio() {
        let rows = sample();
        assert!((completeness_ratio(&rows, TuneField::Rhythm) - 0.8).abs() < 1e-9);
        assert!((completeness_ratio(&rows, TuneField::Title) - 1.0).abs() < 1e-9);
        assert_eq!(completeness_ratio(&rows, TuneField::Composer), 0.0);
        assert_eq!(completeness_ratio(&[], TuneField::Title), 0.0);
    }

    #[test]
    fn test_collection_stats() {
        let stats = collection_stats(&sample());
        assert_eq!(stats.total_tunes, 5);
        assert_eq!(stats.total_books, 2);
        assert_eq!(stats.tunes_per_book.get(&1), Some(&3));
        assert_eq!(stats.rhythm_distribution[0], ("reel".to_string(), 2));
        assert_eq!(stats.rhythm_distribution.len(), 3);
    }

    #[test]
    fn test_queries_do_not_mutate_input() {
        let rows = sample();
        let before = rows.clone();
        let _ = filter_by_rhythm_substring(&rows, "jig");
        let _ = top_n(&rows, TuneField::Rhythm, 3);
        let _ = collection_stats(&rows);
        assert_eq!(rows, before);
    }
}
