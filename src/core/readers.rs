use crate::config::toml_config::ReadersPolicy;
use crate::core::cleaning::{required, run_cleaning};
use crate::core::fields;
use crate::core::raw::ColumnSpec;
use crate::core::{Cleaner, RawRecord};
use crate::domain::model::{CleaningReport, CleaningResult, DatasetKind, ReaderRecord};
use std::io::Read;

pub const READER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        name: "reader_id",
        aliases: &["id", "readerid", "user_id"],
        required: true,
    },
    ColumnSpec {
        name: "name",
        aliases: &["full_name", "reader_name"],
        required: false,
    },
    ColumnSpec {
        name: "email",
        aliases: &["mail", "email_address"],
        required: false,
    },
    ColumnSpec {
        name: "join_date",
        aliases: &["joined", "registration_date", "created_at"],
        required: false,
    },
    ColumnSpec {
        name: "gender",
        aliases: &["sex"],
        required: false,
    },
    ColumnSpec {
        name: "enroll_year",
        aliases: &["enrollment_year"],
        required: false,
    },
    ColumnSpec {
        name: "reader_type",
        aliases: &["type"],
        required: false,
    },
    ColumnSpec {
        name: "department",
        aliases: &["dept"],
        required: false,
    },
];

fn normalize_reader_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadersCleaner {
    policy: ReadersPolicy,
}

impl ReadersCleaner {
    pub fn new(policy: ReadersPolicy) -> Self {
        Self { policy }
    }

    fn clean_row(&self, raw: &RawRecord, report: &mut CleaningReport) -> Option<ReaderRecord> {
        let reader_id = required(raw, "reader_id", normalize_reader_id, report)?;

        let line = raw.line;
        let email_raw = raw.get("email").unwrap_or("");
        let date_raw = raw.get("join_date").unwrap_or("");
        let gender_raw = raw.get("gender").unwrap_or("");
        let year_raw = raw.get("enroll_year").unwrap_or("");

        Some(ReaderRecord {
            reader_id,
            name: raw.get("name").and_then(fields::person_name),
            email: fields::email(email_raw).or_warn(line, "email", email_raw, report),
            join_date: fields::date(date_raw).or_warn(line, "join_date", date_raw, report),
            gender: fields::gender(gender_raw).or_warn(line, "gender", gender_raw, report),
            enroll_year: fields::year(year_raw, &self.policy.enroll_year_range()).or_warn(
                line,
                "enroll_year",
                year_raw,
                report,
            ),
            reader_type: raw.get("reader_type").and_then(fields::categorical),
            department: raw.get("department").and_then(fields::text),
        })
    }
}

impl Cleaner for ReadersCleaner {
    type Record = ReaderRecord;

    fn clean_reader<R: Read>(&self, reader: R) -> CleaningResult<ReaderRecord> {
        run_cleaning(
            DatasetKind::Readers,
            reader,
            READER_COLUMNS,
            self.policy.dedup,
            |raw, report| self.clean_row(raw, report),
        )
    }
}
