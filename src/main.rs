use clap::Parser;
use library_etl::utils::{logger, validation::Validate};
use library_etl::{CleaningConfig, CleaningPipeline, CliConfig, EtlEngine, EtlError, LocalStorage};

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn load_cleaning_config(config: &CliConfig) -> library_etl::Result<CleaningConfig> {
    let cleaning = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading cleaning policy from: {}", path);
            CleaningConfig::from_file(path)?
        }
        None => CleaningConfig::default(),
    };
    cleaning.validate()?;
    Ok(cleaning)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting library-etl ({} dataset)", config.kind);
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let cleaning = match load_cleaning_config(&config) {
        Ok(cleaning) => cleaning,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Cleaning policy: {:?}", cleaning);

    // The input path is used as given, relative to the working directory.
    let source = LocalStorage::new(String::new());
    let sink = LocalStorage::new(config.output_path.clone());
    let pipeline = CleaningPipeline::new(source, sink, config, cleaning);

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Cleaning completed successfully!");
            println!("✅ Cleaning completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
