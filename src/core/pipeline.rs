use crate::config::toml_config::CleaningConfig;
use crate::core::{
    BooksCleaner, CleanOutput, CleanRecord, Cleaner, ConfigProvider, Pipeline, ReadersCleaner,
    Storage,
};
use crate::domain::model::{CleaningResult, DatasetKind};
use crate::utils::error::Result;
use std::path::Path;

/// Cleans one uploaded CSV: reads it from `source`, writes
/// `cleaned_<file name>` (and optionally a JSON report) to `sink`.
pub struct CleaningPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    cleaning: CleaningConfig,
}

impl<S: Storage, C: ConfigProvider> CleaningPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C, cleaning: CleaningConfig) -> Self {
        Self {
            source,
            sink,
            config,
            cleaning,
        }
    }

    fn input_file_name(&self) -> String {
        Path::new(self.config.input_path())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("input.csv")
            .to_string()
    }

    fn write_report(&self) -> bool {
        self.config.write_report() || self.cleaning.output.write_report
    }
}

fn into_output<R: CleanRecord>(
    dataset: DatasetKind,
    result: CleaningResult<R>,
) -> Result<CleanOutput> {
    let table = result.into_result()?;
    Ok(CleanOutput {
        dataset,
        rows: table.len(),
        csv: table.to_csv_bytes()?,
        report: table.report().clone(),
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CleaningPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading input file: {}", self.config.input_path());
        let data = self.source.read_file(self.config.input_path()).await?;
        tracing::debug!("Read {} bytes", data.len());
        Ok(data)
    }

    async fn transform(&self, input: Vec<u8>) -> Result<CleanOutput> {
        let dataset = self.config.dataset();
        match dataset {
            DatasetKind::Books => {
                let cleaner = BooksCleaner::new(self.cleaning.books.clone());
                into_output(dataset, cleaner.clean_reader(input.as_slice()))
            }
            DatasetKind::Readers => {
                let cleaner = ReadersCleaner::new(self.cleaning.readers.clone());
                into_output(dataset, cleaner.clean_reader(input.as_slice()))
            }
        }
    }

    async fn load(&self, output: CleanOutput) -> Result<String> {
        let file_name = format!("cleaned_{}", self.input_file_name());

        tracing::debug!(
            "Writing {} {} rows ({} bytes) to {}",
            output.rows,
            output.dataset,
            output.csv.len(),
            file_name
        );
        self.sink.write_file(&file_name, &output.csv).await?;

        if self.write_report() {
            let stem = Path::new(&file_name)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("cleaned")
                .to_string();
            let report_name = format!("{}.report.json", stem);
            let json_data = serde_json::to_vec_pretty(&output.report)?;
            self.sink.write_file(&report_name, &json_data).await?;
            tracing::debug!("Report saved: {}", report_name);
        }

        Ok(format!("{}/{}", self.config.output_path(), file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        dataset: DatasetKind,
        input: String,
        report: bool,
    }

    impl ConfigProvider for TestConfig {
        fn dataset(&self) -> DatasetKind {
            self.dataset
        }

        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn write_report(&self) -> bool {
            self.report
        }
    }

    fn pipeline(
        dataset: DatasetKind,
        input: &str,
        report: bool,
        source: &MockStorage,
        sink: &MockStorage,
    ) -> CleaningPipeline<MockStorage, TestConfig> {
        CleaningPipeline::new(
            source.clone(),
            sink.clone(),
            TestConfig {
                dataset,
                input: input.to_string(),
                report,
            },
            CleaningConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_readers_pipeline_writes_cleaned_csv() {
        let source = MockStorage::new();
        let sink = MockStorage::new();
        source
            .put_file("readers.csv", b"id,name,email\n1,  Alice ,alice@x.com\n1,Bob,bob@x.com\n")
            .await;
        let pipeline = pipeline(DatasetKind::Readers, "readers.csv", false, &source, &sink);

        let input = pipeline.extract().await.unwrap();
        let output = pipeline.transform(input).await.unwrap();
        assert_eq!(output.rows, 1);
        assert_eq!(output.report.duplicates(), 1);

        let path = pipeline.load(output).await.unwrap();
        assert_eq!(path, "out/cleaned_readers.csv");

        let written = String::from_utf8(sink.get_file("cleaned_readers.csv").await.unwrap()).unwrap();
        assert!(written.contains("1,Alice,alice@x.com"));
        assert!(!written.contains("Bob"));
        assert!(sink.get_file("cleaned_readers.report.json").await.is_none());
    }

    #[tokio::test]
    async fn test_report_is_written_when_enabled() {
        let source = MockStorage::new();
        let sink = MockStorage::new();
        source
            .put_file("books.csv", b"title,author\nDune,Frank Herbert\n,Nobody\n")
            .await;
        let pipeline = pipeline(DatasetKind::Books, "books.csv", true, &source, &sink);

        let input = pipeline.extract().await.unwrap();
        let output = pipeline.transform(input).await.unwrap();
        pipeline.load(output).await.unwrap();

        let report = sink.get_file("cleaned_books.report.json").await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&report).unwrap();
        assert_eq!(json["rows_read"], 2);
        assert_eq!(json["rows_kept"], 1);
        assert_eq!(json["dropped"][0]["reason"]["kind"], "missing_required");
        assert_eq!(json["dropped"][0]["reason"]["column"], "title");
    }

    #[tokio::test]
    async fn test_empty_result_is_an_error() {
        let source = MockStorage::new();
        let sink = MockStorage::new();
        source.put_file("books.csv", b"title,author\n").await;
        let pipeline = pipeline(DatasetKind::Books, "books.csv", false, &source, &sink);

        let input = pipeline.extract().await.unwrap();
        let err = pipeline.transform(input).await.unwrap_err();
        assert!(matches!(err, EtlError::EmptyResult { rows_read: 0, .. }));
    }

    #[tokio::test]
    async fn test_malformed_input_is_parse_failure() {
        let source = MockStorage::new();
        let sink = MockStorage::new();
        source.put_file("books.csv", b"title;author\nDune;Frank Herbert\n").await;
        let pipeline = pipeline(DatasetKind::Books, "books.csv", false, &source, &sink);

        let input = pipeline.extract().await.unwrap();
        let err = pipeline.transform(input).await.unwrap_err();
        assert!(matches!(err, EtlError::ParseFailure { .. }));
    }
}
