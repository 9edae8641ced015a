use anyhow::Result;
use library_etl::{
    CleaningConfig, CleaningPipeline, CliConfig, DatasetKind, EtlEngine, EtlError, LocalStorage,
};
use tempfile::TempDir;

fn cli_config(kind: DatasetKind, input: String, output_path: String, report: bool) -> CliConfig {
    CliConfig {
        kind,
        input,
        output_path,
        config: None,
        report,
        verbose: false,
        log_json: false,
    }
}

#[tokio::test]
async fn test_end_to_end_books_cleaning() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("books.csv");
    std::fs::write(
        &input_path,
        "title,author,isbn,year\n\
         Dune,Frank Herbert,978-0-441-01359-3,1965\n\
         ,Nobody,,\n\
         Dune,Frank Herbert,9780441013593,1965\n",
    )?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = cli_config(
        DatasetKind::Books,
        input_path.to_str().unwrap().to_string(),
        output_path.clone(),
        true,
    );
    let pipeline = CleaningPipeline::new(
        LocalStorage::new(String::new()),
        LocalStorage::new(output_path.clone()),
        config,
        CleaningConfig::default(),
    );

    let result = EtlEngine::new(pipeline).run().await?;
    assert!(result.ends_with("cleaned_books.csv"));

    let csv_content = std::fs::read_to_string(std::path::Path::new(&output_path).join("cleaned_books.csv"))?;
    let lines: Vec<&str> = csv_content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("book_id,isbn,title,author"));
    assert!(lines[1].contains("9780441013593,Dune,Frank Herbert"));

    let report = std::fs::read(std::path::Path::new(&output_path).join("cleaned_books.report.json"))?;
    let report: serde_json::Value = serde_json::from_slice(&report)?;
    assert_eq!(report["rows_read"], 3);
    assert_eq!(report["rows_kept"], 1);
    assert_eq!(report["dropped"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_readers_with_policy_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("readers.csv");
    std::fs::write(
        &input_path,
        "id,name,email\n1,Alice,\n1,Alice Smith,alice@x.com\n",
    )?;
    let policy_path = temp_dir.path().join("cleaning.toml");
    std::fs::write(&policy_path, "[readers]\ndedup = \"most_complete\"\n")?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let cleaning = CleaningConfig::from_file(&policy_path)?;
    let config = cli_config(
        DatasetKind::Readers,
        input_path.to_str().unwrap().to_string(),
        output_path.clone(),
        false,
    );
    let pipeline = CleaningPipeline::new(
        LocalStorage::new(String::new()),
        LocalStorage::new(output_path.clone()),
        config,
        cleaning,
    );

    EtlEngine::new(pipeline).run().await?;

    let csv_content = std::fs::read_to_string(temp_dir.path().join("cleaned_readers.csv"))?;
    assert!(csv_content.contains("1,Alice Smith,alice@x.com"));
    assert!(!temp_dir.path().join("cleaned_readers.report.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_empty_result() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("readers.csv");
    std::fs::write(&input_path, "reader_id,name\n")?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = cli_config(
        DatasetKind::Readers,
        input_path.to_str().unwrap().to_string(),
        output_path.clone(),
        false,
    );
    let pipeline = CleaningPipeline::new(
        LocalStorage::new(String::new()),
        LocalStorage::new(output_path.clone()),
        config,
        CleaningConfig::default(),
    );

    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, EtlError::EmptyResult { .. }));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.user_friendly_message(), "Resulting dataset is empty or cleaning failed");
    assert!(!std::path::Path::new(&output_path).join("cleaned_readers.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_missing_input() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let missing = temp_dir.path().join("missing.csv").to_str().unwrap().to_string();

    let pipeline = CleaningPipeline::new(
        LocalStorage::new(String::new()),
        LocalStorage::new(output_path.clone()),
        cli_config(DatasetKind::Books, missing, output_path, false),
        CleaningConfig::default(),
    );

    let err = EtlEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, EtlError::IoError(_)));
    assert_eq!(err.exit_code(), 3);
    Ok(())
}
