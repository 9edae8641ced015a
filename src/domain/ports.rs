use crate::domain::model::{CleanOutput, CleanRecord, CleaningResult, DatasetKind, EmptyReason};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset(&self) -> DatasetKind;
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn write_report(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<u8>>;
    async fn transform(&self, input: Vec<u8>) -> Result<CleanOutput>;
    async fn load(&self, output: CleanOutput) -> Result<String>;
}

/// Turns one raw CSV into a validated table.
///
/// Implementations never fail with an error: unreadable input and inputs
/// where every row is rejected both come back as [`CleaningResult::Empty`].
pub trait Cleaner: Send + Sync {
    type Record: CleanRecord;

    fn clean_reader<R: Read>(&self, reader: R) -> CleaningResult<Self::Record>;

    fn clean<P: AsRef<Path>>(&self, input_path: P) -> CleaningResult<Self::Record> {
        let path = input_path.as_ref();
        match File::open(path) {
            Ok(file) => self.clean_reader(file),
            Err(e) => {
                tracing::warn!("Cannot open '{}': {}", path.display(), e);
                CleaningResult::Empty(EmptyReason::ParseFailure {
                    message: format!("cannot open '{}': {}", path.display(), e),
                })
            }
        }
    }
}
