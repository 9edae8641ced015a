use crate::core::CleanRecord;
use crate::domain::model::{CleaningReport, DedupPolicy, DropReason};
use std::collections::HashMap;

/// Removes rows whose natural key was already seen.
///
/// `rows` carries each record with its source line. The survivor of a key
/// always takes the position of that key's first occurrence, so output order
/// is stable regardless of policy. Discarded rows are recorded in `report`.
pub fn deduplicate<R: CleanRecord>(
    rows: Vec<(u64, R)>,
    policy: DedupPolicy,
    report: &mut CleaningReport,
) -> Vec<R> {
    let mut slots: HashMap<R::Key, usize> = HashMap::with_capacity(rows.len());
    let mut kept: Vec<(u64, R)> = Vec::with_capacity(rows.len());

    for (line, record) in rows {
        let key = record.natural_key();
        let Some(slot) = slots.get(&key).copied() else {
            slots.insert(key, kept.len());
            kept.push((line, record));
            continue;
        };

        let replace = policy == DedupPolicy::MostComplete
            && record.missing_optional_fields() < kept[slot].1.missing_optional_fields();

        let discarded_line = if replace {
            let (old_line, _) = std::mem::replace(&mut kept[slot], (line, record));
            old_line
        } else {
            line
        };
        report.drop_row(
            discarded_line,
            DropReason::Duplicate {
                key: key.to_string(),
            },
        );
    }

    kept.into_iter().map(|(_, record)| record).collect()
}
