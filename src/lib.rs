pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::CleaningConfig};
pub use crate::core::{
    etl::EtlEngine, pipeline::CleaningPipeline, BooksCleaner, Cleaner, ReadersCleaner,
};
pub use domain::model::{
    BookRecord, CleanTable, CleaningReport, CleaningResult, DatasetKind, DedupPolicy, EmptyReason,
    ReaderRecord,
};
pub use utils::error::{EtlError, Result};
