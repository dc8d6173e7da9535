//! Tune record types
//!
//! [`TuneRecord`] is what the parser produces for one `X:` block of an ABC file.
//! [`TuneRow`] is the stored projection read back from the `tunes` table.
//! Absent values are empty strings (or `0` for the book number), never `None`,
//! matching what the storage layer writes.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One tune's header metadata as parsed from a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuneRecord {
    /// Value of the `X:` line; unique only within its source file
    pub reference: String,
    /// First title seen (`titles[0]`)
    pub title: String,
    /// Every `T:` value in file order
    pub titles: Vec<String>,
    pub meter: String,
    pub length: String,
    pub key: String,
    pub rhythm: String,
    pub composer: String,
    pub source: String,
    pub tempo: String,
    pub z_id: String,
    pub book_ref: String,
    /// Taken from the enclosing book folder name, not from file content
    pub book_number: i64,
    /// Reserved; no marker populates it
    pub notes: String,
}

impl TuneRecord {
    /// Start a record for the given `X:` reference
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Self::default()
        }
    }
}

/// A tune as stored in the `tunes` table, with its store-assigned id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuneRow {
    pub id: i64,
    pub reference: String,
    pub title: String,
    pub meter: String,
    pub length: String,
    /// Stored as `key_signature` since `key` is reserved in SQL
    pub key_signature: String,
    pub rhythm: String,
    pub composer: String,
    pub source: String,
    pub tempo: String,
    pub z_id: String,
    pub book_ref: String,
    pub book_number: i64,
}

impl TuneRow {
    /// Text value of a field for this row
    pub fn field(&self, field: TuneField) -> &str {
        match field {
            TuneField::Reference => &self.reference,
            TuneField::Title => &self.title,
            TuneField::Meter => &self.meter,
            TuneField::Length => &self.length,
            TuneField::Key => &self.key_signature,
            TuneField::Rhythm => &self.rhythm,
            TuneField::Composer => &self.composer,
            TuneField::Source => &self.source,
            TuneField::Tempo => &self.tempo,
            TuneField::ZId => &self.z_id,
            TuneField::BookRef => &self.book_ref,
        }
    }
}

/// Queryable text columns of a stored tune
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuneField {
    Reference,
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

impl TuneField {
    pub const ALL: [TuneField; 11] = [
        TuneField::Reference,
        TuneField::Title,
        TuneField::Meter,
        TuneField::Length,
        TuneField::Key,
        TuneField::Rhythm,
        TuneField::Composer,
        TuneField::Source,
        TuneField::Tempo,
        TuneField::ZId,
        TuneField::BookRef,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TuneField::Reference => "reference",
            TuneField::Title => "title",
            TuneField::Meter => "meter",
            TuneField::Length => "length",
            TuneField::Key => "key",
            TuneField::Rhythm => "rhythm",
            TuneField::Composer => "composer",
            TuneField::Source => "source",
            TuneField::Tempo => "tempo",
            TuneField::ZId => "z_id",
            TuneField::BookRef => "book_ref",
        }
    }
}

impl fmt::Display for TuneField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TuneField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        // key_signature is accepted as the column name of `key`
        if wanted == "key_signature" {
            return Ok(TuneField::Key);
        }
        TuneField::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown tune field: {}", s)))
    }
}
