pub mod books;
mod cleaning;
pub mod dedup;
pub mod etl;
mod export;
pub mod fields;
pub mod pipeline;
pub mod raw;
pub mod readers;

pub use crate::domain::model::{CleanOutput, CleanRecord, RawRecord};
pub use crate::domain::ports::{Cleaner, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use books::BooksCleaner;
pub use readers::ReadersCleaner;
