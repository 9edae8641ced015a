use crate::core::CleanRecord;
use crate::domain::model::CleanTable;
use crate::utils::error::{EtlError, Result};

impl<R: CleanRecord> CleanTable<R> {
    /// UTF-8, comma-delimited, with a header row of canonical column names.
    /// Missing values are written as empty cells.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for record in self.records() {
            wtr.serialize(record)?;
        }
        wtr.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
    }
}
