use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::cleanse::{CleanseConfig, CleanseStats};
use crate::cleanse::cleaner::RowCleaner;
use crate::cleanse::merger::{write_merged, MergeAccumulator};
use crate::cleanse::partition::{chunk_size, count_rows, plan_partitions, PartitionReader};
use crate::cleanse::writer::{report_rate, ChunkWriter};

/// Drives the partition loop: original dump, cleaning, per-chunk outputs, merge.
///
/// Partitions are handled one at a time in index order.
pub struct CleanseProcessor {
    config: CleanseConfig,
    writer: ChunkWriter,
    start_time: Instant,
}

impl CleanseProcessor {
    pub fn new(config: CleanseConfig) -> Result<Self> {
        config.validate()?;

        let writer = ChunkWriter::new(
            config.originals_directory.clone(),
            config.cleaned_directory.clone(),
            config.garbage_directory.clone(),
            config.output_delimiter_byte(),
            config.io_buffer_size_bytes(),
        );

        Ok(Self {
            config,
            writer,
            start_time: Instant::now(),
        })
    }

    pub fn process(&mut self) -> Result<CleanseStats> {
        self.start_time = Instant::now();
        let mut stats = CleanseStats::default();
        let source = &self.config.source_path;

        self.writer.ensure_directories()?;

        let (_, total_rows) = count_rows(
            source,
            self.config.input_delimiter_byte(),
            self.config.io_buffer_size_bytes(),
        )?;
        stats.total_rows = total_rows;
        stats.chunk_size = chunk_size(total_rows, self.config.partition_count);
        println!("📊 Total rows: {}", total_rows);
        println!("📦 Rows per chunk: {}", stats.chunk_size);

        if stats.chunk_size == 0 {
            warn!(
                "Fewer rows ({}) than partitions ({}); all rows land in the last chunk",
                total_rows, self.config.partition_count
            );
        }

        let windows = plan_partitions(total_rows, self.config.partition_count);
        let reader = PartitionReader::open(
            source,
            self.config.input_delimiter_byte(),
            self.config.io_buffer_size_bytes(),
            windows,
        )?;
        let header = reader.header().clone();
        let cleaner = RowCleaner::new(header.clone());
        let mut merged = MergeAccumulator::new();

        for partition in reader {
            let partition = partition?;
            let index = partition.window.index;
            debug!(
                "Chunk {} covers rows {}..{} ({} read)",
                index,
                partition.window.start,
                partition.window.end(),
                partition.rows.len()
            );
            if self.config.verbose {
                println!(
                    "🔎 Chunk {} covers rows {}..{}",
                    index,
                    partition.window.start,
                    partition.window.end()
                );
            }

            self.writer
                .write_original(index, &header, &partition.rows)
                .with_context(|| format!("Failed to save original chunk {}", index))?;

            let outcome = cleaner.clean(&partition.rows);
            println!("🔎 Invalid emails in chunk {}: {}", index, outcome.invalid_emails);
            if outcome.unparsed_gender > 0 {
                warn!(
                    "Chunk {}: {} gender values were not numeric and were treated as missing",
                    index, outcome.unparsed_gender
                );
            }

            let accepted = outcome.accepted.len();
            let garbage = outcome.garbage.len();
            self.writer
                .write_cleaned(index, &outcome.accepted)
                .with_context(|| format!("Failed to save cleaned chunk {}", index))?;
            self.writer
                .write_garbage(index, &outcome.garbage)
                .with_context(|| format!("Failed to save garbage chunk {}", index))?;
            report_rate(index, accepted, garbage);

            stats.partitions_processed += 1;
            stats.malformed_dropped += outcome.malformed_dropped;
            stats.missing_data += outcome.missing_data;
            stats.invalid_emails += outcome.invalid_emails;
            stats.duplicates_dropped += outcome.duplicates_dropped;
            stats.unparsed_gender += outcome.unparsed_gender;
            stats.accepted_rows += accepted;
            stats.garbage_rows += garbage;

            merged.absorb(outcome);
        }

        info!(
            "Merging {} cleaned and {} garbage rows",
            merged.cleaned_len(),
            merged.garbage_len()
        );
        let merged = merged.finish();
        write_merged(
            &merged,
            &self.config.merged_cleaned_file,
            &self.config.merged_garbage_file,
            self.config.output_delimiter_byte(),
            self.config.io_buffer_size_bytes(),
        )?;

        stats.merged_cleaned_rows = merged.cleaned.len();
        stats.merged_garbage_rows = merged.garbage.len();
        stats.cross_partition_duplicates =
            merged.cleaned_duplicates_removed + merged.garbage_duplicates_removed;
        stats.processing_time_ms = self.start_time.elapsed().as_millis() as u64;

        Ok(stats)
    }
}
