use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a whole cleansing run.
///
/// Per-row problems never surface here; they are routed to the garbage set
/// or dropped by the row cleaner.
#[derive(Debug, Error)]
pub enum CleanseError {
    #[error("source file {path} could not be read: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source file {path} is missing required column '{column}'")]
    MissingColumn {
        column: &'static str,
        path: PathBuf,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
