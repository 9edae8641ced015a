use crate::core::dedup::deduplicate;
use crate::core::raw::{read_raw_records, ColumnSpec};
use crate::core::{CleanRecord, RawRecord};
use crate::domain::model::{
    CleanTable, CleaningReport, CleaningResult, DatasetKind, DedupPolicy, DropReason, EmptyReason,
};
use std::io::Read;

/// Read, validate row by row, dedup. Shared by both cleaners.
///
/// `clean_row` returns `None` for rows it rejects, after recording the reason
/// in the report.
pub(crate) fn run_cleaning<I, R, F>(
    dataset: DatasetKind,
    input: I,
    columns: &[ColumnSpec],
    policy: DedupPolicy,
    mut clean_row: F,
) -> CleaningResult<R>
where
    I: Read,
    R: CleanRecord,
    F: FnMut(&RawRecord, &mut CleaningReport) -> Option<R>,
{
    let mut report = CleaningReport::default();
    let raw_records = match read_raw_records(input, columns, &mut report) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("{} input rejected: {}", dataset, e);
            return CleaningResult::Empty(EmptyReason::ParseFailure {
                message: e.to_string(),
            });
        }
    };

    let valid: Vec<(u64, R)> = raw_records
        .iter()
        .filter_map(|raw| clean_row(raw, &mut report).map(|record| (raw.line, record)))
        .collect();

    let records = deduplicate(valid, policy, &mut report);
    report.rows_kept = records.len();

    tracing::info!(
        "Cleaned {} {} rows: {} kept, {} dropped ({} duplicates), {} field warnings",
        report.rows_read,
        dataset,
        report.rows_kept,
        report.rows_dropped(),
        report.duplicates(),
        report.warnings.len()
    );

    if records.is_empty() {
        tracing::warn!("No valid {} rows remain after cleaning", dataset);
        return CleaningResult::Empty(EmptyReason::EmptyAfterCleaning(report));
    }

    CleaningResult::Table(CleanTable::new(records, report))
}

/// Collapsed value of a required column, or `None` after recording the drop.
pub(crate) fn required(
    raw: &RawRecord,
    column: &str,
    normalize: fn(&str) -> Option<String>,
    report: &mut CleaningReport,
) -> Option<String> {
    let value = raw.get(column).and_then(normalize);
    if value.is_none() {
        report.drop_row(
            raw.line,
            DropReason::MissingRequired {
                column: column.to_string(),
            },
        );
    }
    value
}
