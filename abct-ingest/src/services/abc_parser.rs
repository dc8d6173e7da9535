//! ABC header parser
//!
//! Splits one tune-book file into per-tune [`TuneRecord`]s in a single
//! forward pass. Only header lines of the form `<C>:<value>` are read; tune
//! bodies, comments and unknown fields are skipped.
//!
//! | marker | field        |
//! |--------|--------------|
//! | `X:`   | starts a tune (`reference`) |
//! | `T:`   | `titles` (accumulates), `title` (first one) |
//! | `M:`   | `meter`      |
//! | `L:`   | `length`     |
//! | `K:`   | `key`        |
//! | `R:`   | `rhythm`     |
//! | `C:`   | `composer`   |
//! | `S:`   | `source`     |
//! | `Q:`   | `tempo`      |
//! | `Z:`   | `z_id`       |
//! | `B:`   | `book_ref`   |
//!
//! Apart from `T:`, a repeated marker overwrites the earlier value.

use crate::services::corpus_loader::LoadError;
use abct_common::TuneRecord;
use std::path::Path;
use tracing::trace;

/// Header line kinds recognized by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Start,
    Title,
    Meter,
    Length,
    Key,
    Rhythm,
    Composer,
    Source,
    Tempo,
    ZId,
    BookRef,
}

impl Marker {
    fn from_code(code: char) -> Option<Self> {
        let marker = match code {
            'X' => Marker::Start,
            'T' => Marker::Title,
            'M' => Marker::Meter,
            'L' => Marker::Length,
            'K' => Marker::Key,
            'R' => Marker::Rhythm,
            'C' => Marker::Composer,
            'S' => Marker::Source,
            'Q' => Marker::Tempo,
            'Z' => Marker::ZId,
            'B' => Marker::BookRef,
            _ => return None,
        };
        Some(marker)
    }
}

/// Classify a trimmed line as `(marker, value)` or `None` for anything else
fn classify(line: &str) -> Option<(Marker, &str)> {
    let mut chars = line.chars();
    let code = chars.next()?;
    if chars.next()? != ':' {
        return None;
    }
    let marker = Marker::from_code(code)?;
    // Both prefix characters are ASCII, so byte offset 2 is a char boundary
    Some((marker, line[2..].trim()))
}

fn apply(tune: &mut TuneRecord, marker: Marker, value: &str) {
    let slot = match marker {
        Marker::Start => return,
        Marker::Title => {
            if tune.titles.is_empty() {
                tune.title = value.to_string();
            }
            tune.titles.push(value.to_string());
            return;
        }
        Marker::Meter => &mut tune.meter,
        Marker::Length => &mut tune.length,
        Marker::Key => &mut tune.key,
        Marker::Rhythm => &mut tune.rhythm,
        Marker::Composer => &mut tune.composer,
        Marker::Source => &mut tune.source,
        Marker::Tempo => &mut tune.tempo,
        Marker::ZId => &mut tune.z_id,
        Marker::BookRef => &mut tune.book_ref,
    };
    *slot = value.to_string();
}

/// Parse lines of one file into tune records stamped with `book_number`
///
/// Never fails: lines that are not recognized headers are ignored, as are
/// headers that appear before the first `X:` line.
pub fn parse_abc_lines<'a, I>(lines: I, book_number: i64) -> Vec<TuneRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tunes = Vec::new();
    let mut current: Option<TuneRecord> = None;

    for (line_no, raw) in lines.into_iter().enumerate() {
        let Some((marker, value)) = classify(raw.trim()) else {
            continue;
        };

        if marker == Marker::Start {
            if let Some(mut finished) = current.take() {
                finished.book_number = book_number;
                tunes.push(finished);
            }
            current = Some(TuneRecord::new(value));
            continue;
        }

        match current.as_mut() {
            Some(tune) => apply(tune, marker, value),
            None => {
                trace!("Ignoring {:?} header before first X: on line {}", marker, line_no + 1);
            }
        }
    }

    // The last tune has no following X: to flush it
    if let Some(mut finished) = current {
        finished.book_number = book_number;
        tunes.push(finished);
    }

    tunes
}

/// Parse file content already held in memory
pub fn parse_abc_str(text: &str, book_number: i64) -> Vec<TuneRecord> {
    parse_abc_lines(text.lines(), book_number)
}

/// Read a `.abc` file as UTF-8 and parse it
pub fn parse_abc_file(path: &Path, book_number: i64) -> Result<Vec<TuneRecord>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_abc_str(&text, book_number))
}
