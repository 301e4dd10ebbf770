use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::cleanse::constants::*;
use crate::cleanse::error::CleanseError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanseConfig {
    pub source_path: PathBuf,
    pub originals_directory: PathBuf,
    pub cleaned_directory: PathBuf,
    pub garbage_directory: PathBuf,
    pub merged_cleaned_file: PathBuf,
    pub merged_garbage_file: PathBuf,
    pub partition_count: usize,
    pub input_delimiter: char,
    pub output_delimiter: char,
    pub io_buffer_size_kb: usize,
    pub verbose: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbosity: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbosity: "normal".to_string(),
        }
    }
}

impl Default for CleanseConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            originals_directory: PathBuf::from(DEFAULT_ORIGINALS_DIRECTORY),
            cleaned_directory: PathBuf::from(DEFAULT_CLEANED_DIRECTORY),
            garbage_directory: PathBuf::from(DEFAULT_GARBAGE_DIRECTORY),
            merged_cleaned_file: PathBuf::from(DEFAULT_MERGED_CLEANED_FILE),
            merged_garbage_file: PathBuf::from(DEFAULT_MERGED_GARBAGE_FILE),
            partition_count: DEFAULT_PARTITION_COUNT,
            input_delimiter: DEFAULT_INPUT_DELIMITER,
            output_delimiter: DEFAULT_OUTPUT_DELIMITER,
            io_buffer_size_kb: DEFAULT_IO_BUFFER_SIZE_KB,
            verbose: false,
            logging: LoggingConfig::default(),
        }
    }
}

/// Startup overrides layered on top of the config file (CLI flags and env vars).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_path: Option<PathBuf>,
    pub originals_directory: Option<PathBuf>,
    pub cleaned_directory: Option<PathBuf>,
    pub garbage_directory: Option<PathBuf>,
    pub merged_cleaned_file: Option<PathBuf>,
    pub merged_garbage_file: Option<PathBuf>,
    pub partition_count: Option<usize>,
    pub verbose: bool,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut CleanseConfig) {
        if let Some(path) = self.source_path {
            config.source_path = path;
        }
        if let Some(dir) = self.originals_directory {
            config.originals_directory = dir;
        }
        if let Some(dir) = self.cleaned_directory {
            config.cleaned_directory = dir;
        }
        if let Some(dir) = self.garbage_directory {
            config.garbage_directory = dir;
        }
        if let Some(file) = self.merged_cleaned_file {
            config.merged_cleaned_file = file;
        }
        if let Some(file) = self.merged_garbage_file {
            config.merged_garbage_file = file;
        }
        if let Some(count) = self.partition_count {
            config.partition_count = count;
        }
        if self.verbose {
            config.verbose = true;
            config.logging.verbosity = "verbose".to_string();
        }
    }
}

impl CleanseConfig {
    /// Parses the file only; call [`CleanseConfig::validate`] once overrides are applied.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Async variant of [`CleanseConfig::from_file`]; does not validate either.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, CleanseError> {
        overrides.apply(&mut self);
        self.validate()?;
        Ok(self)
    }

    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CleanseError> {
        if self.partition_count < MIN_PARTITION_COUNT || self.partition_count > MAX_PARTITION_COUNT {
            return Err(CleanseError::InvalidConfig(format!(
                "Partition count must be between {} and {}",
                MIN_PARTITION_COUNT, MAX_PARTITION_COUNT
            )));
        }

        if self.io_buffer_size_kb < MIN_IO_BUFFER_SIZE_KB || self.io_buffer_size_kb > MAX_IO_BUFFER_SIZE_KB {
            return Err(CleanseError::InvalidConfig(format!(
                "I/O buffer size must be between {} and {} KB",
                MIN_IO_BUFFER_SIZE_KB, MAX_IO_BUFFER_SIZE_KB
            )));
        }

        for (name, delimiter) in [("Input", self.input_delimiter), ("Output", self.output_delimiter)] {
            if !delimiter.is_ascii() || delimiter as u8 == CSV_QUOTE_CHAR || delimiter == '\n' || delimiter == '\r' {
                return Err(CleanseError::InvalidConfig(format!(
                    "{} delimiter must be a single ASCII character other than a quote or line break, got {:?}",
                    name, delimiter
                )));
            }
        }

        let outputs = [
            &self.originals_directory,
            &self.cleaned_directory,
            &self.garbage_directory,
            &self.merged_cleaned_file,
            &self.merged_garbage_file,
        ];
        if outputs.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(CleanseError::InvalidConfig("Output paths must not be empty".to_string()));
        }
        if self.merged_cleaned_file == self.merged_garbage_file {
            return Err(CleanseError::InvalidConfig(
                "Merged cleaned and garbage files must differ".to_string(),
            ));
        }

        Ok(())
    }

    pub fn input_delimiter_byte(&self) -> u8 {
        self.input_delimiter as u8
    }

    pub fn output_delimiter_byte(&self) -> u8 {
        self.output_delimiter as u8
    }

    pub fn io_buffer_size_bytes(&self) -> usize {
        self.io_buffer_size_kb * BYTES_PER_KB
    }
}
