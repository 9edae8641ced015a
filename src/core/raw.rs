//! Reads a headed CSV into [`RawRecord`]s keyed by canonical column name.

use crate::core::RawRecord;
use crate::domain::model::{CleaningReport, DropReason};
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;
use std::io::Read;

/// A canonical output column and the header spellings that map onto it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl ColumnSpec {
    fn matches(&self, header: &str) -> bool {
        self.name == header || self.aliases.contains(&header)
    }
}

/// Strips a UTF-8 BOM, trims, lowercases, and turns spaces and hyphens into `_`.
pub fn normalize_header(cell: &str) -> String {
    cell.trim_start_matches('\u{feff}')
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Reads every data row, counting them in `report.rows_read`.
///
/// Blank and whitespace-only lines are skipped. Short rows read their missing
/// trailing cells as empty; rows with more cells than the header are dropped
/// as malformed.
pub fn read_raw_records<R: Read>(
    reader: R,
    columns: &[ColumnSpec],
    report: &mut CleaningReport,
) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    // (csv index, canonical name); the first header that maps to a name wins.
    let mut mapping: Vec<(usize, &'static str)> = Vec::with_capacity(columns.len());
    for (idx, cell) in headers.iter().enumerate() {
        let normalized = normalize_header(cell);
        if let Some(spec) = columns.iter().find(|spec| spec.matches(&normalized)) {
            if mapping.iter().all(|(_, name)| *name != spec.name) {
                mapping.push((idx, spec.name));
            }
        }
    }

    for spec in columns.iter().filter(|spec| spec.required) {
        if mapping.iter().all(|(_, name)| *name != spec.name) {
            return Err(EtlError::ParseFailure {
                message: format!(
                    "missing required column '{}'. headers={:?}",
                    spec.name,
                    headers.iter().collect::<Vec<_>>()
                ),
            });
        }
    }

    tracing::debug!(
        "Mapped {} of {} header columns: {:?}",
        mapping.len(),
        headers.len(),
        mapping
    );

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        report.rows_read += 1;
        if record.len() > headers.len() {
            report.drop_row(
                line,
                DropReason::Malformed {
                    fields: record.len(),
                    expected: headers.len(),
                },
            );
            continue;
        }

        let mut fields = HashMap::with_capacity(mapping.len());
        for (idx, name) in &mapping {
            fields.insert(name.to_string(), record.get(*idx).unwrap_or("").to_string());
        }
        records.push(RawRecord { line, fields });
    }

    Ok(records)
}
