use anyhow::Result;
use std::path::Path;
use crate::cleanse::cleaner::{dedup_full_rows, CleanOutcome};
use crate::cleanse::record::CleanedRecord;
use crate::cleanse::writer::write_cleaned_records;

/// Append-only accumulators for the accepted and garbage rows of every partition.
///
/// Owned by the driver loop. Rows are appended in partition order and are only
/// deduplicated once, in [`MergeAccumulator::finish`].
#[derive(Debug, Default)]
pub struct MergeAccumulator {
    cleaned: Vec<CleanedRecord>,
    garbage: Vec<CleanedRecord>,
}

#[derive(Debug, Default, Clone)]
pub struct MergedSets {
    pub cleaned: Vec<CleanedRecord>,
    pub garbage: Vec<CleanedRecord>,
    pub cleaned_duplicates_removed: usize,
    pub garbage_duplicates_removed: usize,
}

impl MergeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, outcome: CleanOutcome) {
        self.cleaned.extend(outcome.accepted);
        self.garbage.extend(outcome.garbage);
    }

    pub fn cleaned_len(&self) -> usize {
        self.cleaned.len()
    }

    pub fn garbage_len(&self) -> usize {
        self.garbage.len()
    }

    /// Drops rows that are identical across partitions, keeping the first.
    pub fn finish(self) -> MergedSets {
        let cleaned_before = self.cleaned.len();
        let garbage_before = self.garbage.len();

        let cleaned = dedup_full_rows(self.cleaned);
        let garbage = dedup_full_rows(self.garbage);

        MergedSets {
            cleaned_duplicates_removed: cleaned_before - cleaned.len(),
            garbage_duplicates_removed: garbage_before - garbage.len(),
            cleaned,
            garbage,
        }
    }
}

/// Both merged files are always written, header-only when their set is empty.
pub fn write_merged(
    merged: &MergedSets,
    cleaned_file: &Path,
    garbage_file: &Path,
    delimiter: u8,
    io_buffer_size: usize,
) -> Result<()> {
    for file in [cleaned_file, garbage_file] {
        if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    write_cleaned_records(cleaned_file, &merged.cleaned, delimiter, io_buffer_size)?;
    println!("🔗 Saved merged cleaned data to {} ({} rows)", cleaned_file.display(), merged.cleaned.len());

    write_cleaned_records(garbage_file, &merged.garbage, delimiter, io_buffer_size)?;
    println!("🔗 Saved merged garbage data to {} ({} rows)", garbage_file.display(), merged.garbage.len());

    Ok(())
}
