use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use csv::{Writer, WriterBuilder};
use crate::cleanse::constants::*;
use crate::cleanse::record::{CleanedRecord, SourceHeader, SourceRecord};

pub struct ChunkWriter {
    originals_directory: PathBuf,
    cleaned_directory: PathBuf,
    garbage_directory: PathBuf,
    delimiter: u8,
    io_buffer_size: usize,
}

impl ChunkWriter {
    pub fn new(
        originals_directory: PathBuf,
        cleaned_directory: PathBuf,
        garbage_directory: PathBuf,
        delimiter: u8,
        io_buffer_size: usize,
    ) -> Self {
        Self {
            originals_directory,
            cleaned_directory,
            garbage_directory,
            delimiter,
            io_buffer_size,
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.originals_directory, &self.cleaned_directory, &self.garbage_directory] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
            println!("📁 Directory created or exists: {}", dir.display());
        }
        Ok(())
    }

    pub fn original_path(&self, index: usize) -> PathBuf {
        chunk_path(&self.originals_directory, ORIGINAL_CHUNK_PREFIX, index)
    }

    pub fn cleaned_path(&self, index: usize) -> PathBuf {
        chunk_path(&self.cleaned_directory, CLEANED_CHUNK_PREFIX, index)
    }

    pub fn garbage_path(&self, index: usize) -> PathBuf {
        chunk_path(&self.garbage_directory, GARBAGE_CHUNK_PREFIX, index)
    }

    /// Dumps the partition exactly as read, before any cleaning.
    pub fn write_original(
        &self,
        index: usize,
        header: &SourceHeader,
        rows: &[SourceRecord],
    ) -> Result<PathBuf> {
        let path = self.original_path(index);
        let mut writer = open_writer(&path, self.delimiter, self.io_buffer_size)?;

        writer.write_record(&header.raw)?;
        for row in rows {
            writer.write_record(&row.fields)?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;

        println!("💾 Saved original chunk {} to {}", index, path.display());
        Ok(path)
    }

    /// Returns `None` without touching the filesystem when there is nothing to save.
    pub fn write_cleaned(&self, index: usize, records: &[CleanedRecord]) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            println!("🫙 Chunk {} is empty after cleaning.", index);
            return Ok(None);
        }

        let path = self.cleaned_path(index);
        write_cleaned_records(&path, records, self.delimiter, self.io_buffer_size)?;
        println!("✨ Saved cleaned chunk {} to {} ({} rows)", index, path.display(), records.len());
        Ok(Some(path))
    }

    pub fn write_garbage(&self, index: usize, records: &[CleanedRecord]) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            println!("🧼 No garbage data for chunk {}.", index);
            return Ok(None);
        }

        let path = self.garbage_path(index);
        write_cleaned_records(&path, records, self.delimiter, self.io_buffer_size)?;
        println!("🗑️ Saved garbage data for chunk {} to {} ({} rows)", index, path.display(), records.len());
        Ok(Some(path))
    }
}

/// Ratio of accepted to garbage rows, undefined when there is no garbage.
pub fn clean_to_garbage_rate(accepted: usize, garbage: usize) -> Option<f64> {
    if garbage == 0 {
        None
    } else {
        Some(accepted as f64 / garbage as f64)
    }
}

pub fn report_rate(index: usize, accepted: usize, garbage: usize) {
    match clean_to_garbage_rate(accepted, garbage) {
        Some(rate) => println!("📈 Clean to Garbage Rate for chunk {}: {:.2}", index, rate),
        None => println!("📈 No garbage data for chunk {}, rate not applicable.", index),
    }
}

fn chunk_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{}{}{}", prefix, index, CHUNK_FILE_EXTENSION))
}

fn open_writer(path: &Path, delimiter: u8, io_buffer_size: usize) -> Result<Writer<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    // source rows may be longer than the header; they are dumped as read
    Ok(WriterBuilder::new()
        .flexible(true)
        .delimiter(delimiter)
        .quote(CSV_QUOTE_CHAR)
        .buffer_capacity(io_buffer_size)
        .from_writer(file))
}

/// Writes cleaned-schema rows with their header. An empty slice yields a header-only file.
pub fn write_cleaned_records(
    path: &Path,
    records: &[CleanedRecord],
    delimiter: u8,
    io_buffer_size: usize,
) -> Result<()> {
    let mut writer = open_writer(path, delimiter, io_buffer_size)?;

    writer.write_record(CLEANED_COLUMNS)?;
    for record in records {
        writer.write_record(record.to_csv_fields())?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    Ok(())
}
