// Chunked cleansing pipeline - the main implementation
pub mod cleanse;

// Logging setup and report formatting
pub mod utils;

// Re-export main types for convenience
pub use cleanse::{run_cleanse, CleanseConfig, ConfigOverrides, CleanseError, CleanseProcessor, CleanseStats};
