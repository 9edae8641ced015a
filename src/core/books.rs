use crate::config::toml_config::BooksPolicy;
use crate::core::cleaning::{required, run_cleaning};
use crate::core::fields;
use crate::core::raw::ColumnSpec;
use crate::core::{Cleaner, RawRecord};
use crate::domain::model::{BookRecord, CleaningReport, CleaningResult, DatasetKind};
use std::io::Read;

pub const BOOK_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        name: "book_id",
        aliases: &["id"],
        required: false,
    },
    ColumnSpec {
        name: "isbn",
        aliases: &["isbn13", "isbn_13", "isbn10", "isbn_10"],
        required: false,
    },
    ColumnSpec {
        name: "title",
        aliases: &["book_title", "name"],
        required: true,
    },
    ColumnSpec {
        name: "author",
        aliases: &["authors", "writer"],
        required: true,
    },
    ColumnSpec {
        name: "publisher",
        aliases: &["press"],
        required: false,
    },
    ColumnSpec {
        name: "publication_year",
        aliases: &["year", "pub_year", "published_year"],
        required: false,
    },
    ColumnSpec {
        name: "genre",
        aliases: &["category"],
        required: false,
    },
    ColumnSpec {
        name: "call_no",
        aliases: &["call_number"],
        required: false,
    },
    ColumnSpec {
        name: "language",
        aliases: &["lang"],
        required: false,
    },
    ColumnSpec {
        name: "doc_type",
        aliases: &["type"],
        required: false,
    },
];

#[derive(Debug, Clone, Default)]
pub struct BooksCleaner {
    policy: BooksPolicy,
}

impl BooksCleaner {
    pub fn new(policy: BooksPolicy) -> Self {
        Self { policy }
    }

    fn clean_row(&self, raw: &RawRecord, report: &mut CleaningReport) -> Option<BookRecord> {
        let title = required(raw, "title", fields::text, report)?;
        let author = required(raw, "author", fields::text, report)?;

        let line = raw.line;
        let isbn_raw = raw.get("isbn").unwrap_or("");
        let year_raw = raw.get("publication_year").unwrap_or("");

        Some(BookRecord {
            book_id: raw.get("book_id").and_then(fields::text),
            isbn: fields::isbn(isbn_raw).or_warn(line, "isbn", isbn_raw, report),
            title,
            author,
            publisher: raw.get("publisher").and_then(fields::text),
            publication_year: fields::year(year_raw, &self.policy.year_range()).or_warn(
                line,
                "publication_year",
                year_raw,
                report,
            ),
            genre: raw.get("genre").and_then(fields::categorical),
            call_no: raw.get("call_no").and_then(fields::text),
            language: raw.get("language").and_then(fields::categorical),
            doc_type: raw.get("doc_type").and_then(fields::categorical),
        })
    }
}

impl Cleaner for BooksCleaner {
    type Record = BookRecord;

    fn clean_reader<R: Read>(&self, reader: R) -> CleaningResult<BookRecord> {
        run_cleaning(
            DatasetKind::Books,
            reader,
            BOOK_COLUMNS,
            self.policy.dedup,
            |raw, report| self.clean_row(raw, report),
        )
    }
}
