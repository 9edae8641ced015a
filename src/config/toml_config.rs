use crate::domain::model::DedupPolicy;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_ordered_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Cleaning policy, loaded from an optional TOML file. Every table and key
/// may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub books: BooksPolicy,
    pub readers: ReadersPolicy,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooksPolicy {
    pub min_year: i32,
    pub max_year: i32,
    pub dedup: DedupPolicy,
}

impl Default for BooksPolicy {
    fn default() -> Self {
        Self {
            min_year: 1000,
            max_year: 2100,
            dedup: DedupPolicy::FirstSeen,
        }
    }
}

impl BooksPolicy {
    pub fn year_range(&self) -> RangeInclusive<i32> {
        self.min_year..=self.max_year
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadersPolicy {
    pub min_enroll_year: i32,
    pub max_enroll_year: i32,
    pub dedup: DedupPolicy,
}

impl Default for ReadersPolicy {
    fn default() -> Self {
        Self {
            min_enroll_year: 1900,
            max_enroll_year: 2100,
            dedup: DedupPolicy::FirstSeen,
        }
    }
}

impl ReadersPolicy {
    pub fn enroll_year_range(&self) -> RangeInclusive<i32> {
        self.min_enroll_year..=self.max_enroll_year
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Also write `cleaned_<stem>.report.json` next to the cleaned CSV.
    pub write_report: bool,
}

impl CleaningConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAX_YEAR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_ordered_range("books.min_year..books.max_year", self.books.min_year, self.books.max_year)?;
        validate_ordered_range(
            "readers.min_enroll_year..readers.max_enroll_year",
            self.readers.min_enroll_year,
            self.readers.max_enroll_year,
        )?;
        Ok(())
    }
}

impl Validate for CleaningConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
