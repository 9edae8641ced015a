use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Books,
    Readers,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Books => "books",
            DatasetKind::Readers => "readers",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which duplicate survives when several rows share a natural key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    #[default]
    FirstSeen,
    /// Fewest missing optional fields wins; ties go to the earlier row.
    MostComplete,
}

/// One input row, keyed by canonical column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line in the source file; the header is line 1.
    pub line: u64,
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A validated output row.
pub trait CleanRecord: Serialize + Clone + Send {
    type Key: Eq + Hash + Clone + fmt::Display;

    fn natural_key(&self) -> Self::Key;

    fn missing_optional_fields(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    pub book_id: Option<String>,
    pub isbn: Option<String>,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
    pub call_no: Option<String>,
    pub language: Option<String>,
    pub doc_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookKey {
    Isbn(String),
    TitleAuthor { title: String, author: String },
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookKey::Isbn(isbn) => write!(f, "isbn:{}", isbn),
            BookKey::TitleAuthor { title, author } => write!(f, "title+author:{}|{}", title, author),
        }
    }
}

impl CleanRecord for BookRecord {
    type Key = BookKey;

    fn natural_key(&self) -> BookKey {
        match &self.isbn {
            Some(isbn) => BookKey::Isbn(isbn.clone()),
            None => BookKey::TitleAuthor {
                title: self.title.to_lowercase(),
                author: self.author.to_lowercase(),
            },
        }
    }

    fn missing_optional_fields(&self) -> usize {
        [
            self.book_id.is_none(),
            self.isbn.is_none(),
            self.publisher.is_none(),
            self.publication_year.is_none(),
            self.genre.is_none(),
            self.call_no.is_none(),
            self.language.is_none(),
            self.doc_type.is_none(),
        ]
        .iter()
        .filter(|missing| **missing)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReaderRecord {
    pub reader_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub enroll_year: Option<i32>,
    pub reader_type: Option<String>,
    pub department: Option<String>,
}

impl CleanRecord for ReaderRecord {
    type Key = String;

    fn natural_key(&self) -> String {
        self.reader_id.clone()
    }

    fn missing_optional_fields(&self) -> usize {
        [
            self.name.is_none(),
            self.email.is_none(),
            self.join_date.is_none(),
            self.gender.is_none(),
            self.enroll_year.is_none(),
            self.reader_type.is_none(),
            self.department.is_none(),
        ]
        .iter()
        .filter(|missing| **missing)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropReason {
    MissingRequired { column: String },
    Duplicate { key: String },
    /// More cells than the header has columns.
    Malformed { fields: usize, expected: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRow {
    pub line: u64,
    pub reason: DropReason,
}

/// A field that failed validation and was nulled; the row itself was kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWarning {
    pub line: u64,
    pub column: String,
    pub raw: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped: Vec<DroppedRow>,
    pub warnings: Vec<FieldWarning>,
}

impl CleaningReport {
    pub fn rows_dropped(&self) -> usize {
        self.dropped.len()
    }

    pub fn duplicates(&self) -> usize {
        self.dropped
            .iter()
            .filter(|row| matches!(row.reason, DropReason::Duplicate { .. }))
            .count()
    }

    pub(crate) fn drop_row(&mut self, line: u64, reason: DropReason) {
        tracing::debug!("Dropping line {}: {:?}", line, reason);
        self.dropped.push(DroppedRow { line, reason });
    }

    pub(crate) fn warn(&mut self, line: u64, column: &str, raw: &str, reason: String) {
        tracing::debug!("Line {} column '{}' nulled: {} (raw='{}')", line, column, reason, raw);
        self.warnings.push(FieldWarning {
            line,
            column: column.to_string(),
            raw: raw.to_string(),
            reason,
        });
    }
}

/// Cleaned rows in input order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTable<R> {
    records: Vec<R>,
    report: CleaningReport,
}

impl<R> CleanTable<R> {
    pub(crate) fn new(records: Vec<R>, report: CleaningReport) -> Self {
        debug_assert!(!records.is_empty());
        Self { records, report }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmptyReason {
    /// The input was unreadable, not CSV, or lacked a required column.
    ParseFailure { message: String },
    /// The input parsed but every row was rejected.
    EmptyAfterCleaning(CleaningReport),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CleaningResult<R> {
    Table(CleanTable<R>),
    Empty(EmptyReason),
}

impl<R> CleaningResult<R> {
    pub fn into_table(self) -> Option<CleanTable<R>> {
        match self {
            CleaningResult::Table(table) => Some(table),
            CleaningResult::Empty(_) => None,
        }
    }

    pub fn into_result(self) -> Result<CleanTable<R>> {
        match self {
            CleaningResult::Table(table) => Ok(table),
            CleaningResult::Empty(EmptyReason::ParseFailure { message }) => {
                Err(EtlError::ParseFailure { message })
            }
            CleaningResult::Empty(EmptyReason::EmptyAfterCleaning(report)) => {
                Err(EtlError::EmptyResult {
                    rows_read: report.rows_read,
                    rows_dropped: report.rows_dropped(),
                })
            }
        }
    }
}

/// Serialized output of one cleaning run, handed from transform to load.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    pub dataset: DatasetKind,
    pub rows: usize,
    pub csv: Vec<u8>,
    pub report: CleaningReport,
}
