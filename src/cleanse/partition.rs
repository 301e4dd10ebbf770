use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};
use csv::{Reader, ReaderBuilder, StringRecord};
use crate::cleanse::constants::*;
use crate::cleanse::error::CleanseError;
use crate::cleanse::record::{SourceHeader, SourceRecord};

/// A contiguous row range `[start, start + len)` of the source, header excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionWindow {
    pub index: usize,
    pub start: usize,
    pub len: usize,
}

impl PartitionWindow {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone)]
pub struct Partition {
    pub window: PartitionWindow,
    pub rows: Vec<SourceRecord>,
}

/// Splits `total_rows` into `partition_count` windows of `total_rows / partition_count`
/// rows each. The last window runs to the end of the source and takes the remainder.
///
/// With fewer rows than partitions the chunk size is zero, so every window but the
/// last is empty.
pub fn plan_partitions(total_rows: usize, partition_count: usize) -> Vec<PartitionWindow> {
    if partition_count == 0 {
        return Vec::new();
    }

    let chunk_size = total_rows / partition_count;
    (0..partition_count)
        .map(|index| {
            let start = index * chunk_size;
            let len = if index == partition_count - 1 {
                total_rows - start
            } else {
                chunk_size
            };
            PartitionWindow { index, start, len }
        })
        .collect()
}

pub fn chunk_size(total_rows: usize, partition_count: usize) -> usize {
    if partition_count == 0 {
        0
    } else {
        total_rows / partition_count
    }
}

fn open_source(
    path: &Path,
    delimiter: u8,
    io_buffer_size: usize,
) -> Result<(SourceHeader, Reader<File>), CleanseError> {
    let file = File::open(path).map_err(|source| CleanseError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(CSV_QUOTE_CHAR)
        .has_headers(true)
        .flexible(true)
        .buffer_capacity(io_buffer_size)
        .from_reader(file);

    let header_record = reader
        .headers()
        .map_err(|source| CleanseError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let header = SourceHeader::from_csv_record(&header_record, path)?;

    Ok((header, reader))
}

/// Reads the whole source once to count its data rows, validating the header on the way.
pub fn count_rows(
    path: &Path,
    delimiter: u8,
    io_buffer_size: usize,
) -> Result<(SourceHeader, usize), CleanseError> {
    let (header, mut reader) = open_source(path, delimiter, io_buffer_size)?;
    let mut record = StringRecord::new();
    let mut total = 0;

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => total += 1,
            Ok(false) => break,
            Err(source) => {
                return Err(CleanseError::Csv {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    Ok((header, total))
}

/// Sequential reader that hands out the planned partitions in index order.
///
/// Only the rows of the partition being returned are held in memory.
pub struct PartitionReader {
    path: PathBuf,
    header: SourceHeader,
    reader: Reader<File>,
    windows: VecDeque<PartitionWindow>,
    record: StringRecord,
}

impl PartitionReader {
    pub fn open(
        path: &Path,
        delimiter: u8,
        io_buffer_size: usize,
        windows: Vec<PartitionWindow>,
    ) -> Result<Self, CleanseError> {
        let (header, reader) = open_source(path, delimiter, io_buffer_size)?;
        Ok(Self {
            path: path.to_path_buf(),
            header,
            reader,
            windows: windows.into(),
            record: StringRecord::new(),
        })
    }

    pub fn header(&self) -> &SourceHeader {
        &self.header
    }

    fn read_window(&mut self, window: PartitionWindow) -> Result<Partition, CleanseError> {
        let mut rows = Vec::with_capacity(window.len);

        while rows.len() < window.len {
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|source| CleanseError::Csv {
                    path: self.path.clone(),
                    source,
                })?;
            if !more {
                break;
            }

            let mut row = SourceRecord::from_csv_record(&self.record);
            // short rows are padded so the original dump stays rectangular
            if row.fields.len() < self.header.len() {
                row.fields.resize(self.header.len(), String::new());
            }
            rows.push(row);
        }

        Ok(Partition { window, rows })
    }
}

impl Iterator for PartitionReader {
    type Item = Result<Partition, CleanseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let window = self.windows.pop_front()?;
        Some(self.read_window(window))
    }
}
