pub mod config;
pub mod constants;
pub mod error;
pub mod record;
pub mod partition;
pub mod cleaner;
pub mod writer;
pub mod merger;
pub mod processor;

#[cfg(test)]
mod tests;

pub use config::{CleanseConfig, ConfigOverrides};
pub use error::CleanseError;
pub use processor::CleanseProcessor;
pub use record::{CleanedRecord, SourceRecord};

use anyhow::Result;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanseStats {
    pub total_rows: usize,
    pub chunk_size: usize,
    pub partitions_processed: usize,
    pub malformed_dropped: usize,
    pub missing_data: usize,
    pub invalid_emails: usize,
    pub duplicates_dropped: usize,
    pub unparsed_gender: usize,
    pub accepted_rows: usize,
    pub garbage_rows: usize,
    pub merged_cleaned_rows: usize,
    pub merged_garbage_rows: usize,
    pub cross_partition_duplicates: usize,
    pub processing_time_ms: u64,
}

pub fn run_cleanse(config: CleanseConfig) -> Result<CleanseStats> {
    let mut processor = CleanseProcessor::new(config)?;
    processor.process()
}
