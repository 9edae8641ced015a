pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::DatasetKind;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "library-etl")]
#[command(about = "Cleans books and readers CSV exports for the library importer")]
pub struct CliConfig {
    /// Which dataset the input file holds
    #[arg(long, value_enum)]
    pub kind: DatasetKind,

    /// CSV file to clean
    #[arg(long)]
    pub input: String,

    /// Directory that receives cleaned_<input name>
    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// TOML file with cleaning policy overrides
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Also write a JSON report of dropped rows and field warnings")]
    pub report: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn dataset(&self) -> DatasetKind {
        self.kind
    }

    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn write_report(&self) -> bool {
        self.report
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("input", &self.input)?;
        validate_file_extension("input", &self.input, &["csv"])?;
        validate_path("output_path", &self.output_path)?;
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        Ok(())
    }
}
