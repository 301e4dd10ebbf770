use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tuonella_cleanse::cleanse::constants::DEFAULT_CONFIG_FILE;
use tuonella_cleanse::utils::{format_duration, format_rate, setup_logging};
use tuonella_cleanse::{CleanseConfig, CleanseProcessor, ConfigOverrides};

#[derive(Parser)]
#[command(name = "tuonella-cleanse")]
#[command(about = "🧹 Tuonella Cleanse: chunked cleaning of user exports into cleaned and garbage sets")]
#[command(version)]
struct Args {
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, help = "Configuration file")]
    config: PathBuf,

    #[arg(short, long, env = "CLEANSE_SOURCE", help = "Semicolon-delimited source export")]
    input: Option<PathBuf>,

    #[arg(long, env = "CLEANSE_ORIGINALS_DIR", help = "Directory for original chunk dumps")]
    originals_dir: Option<PathBuf>,

    #[arg(long, env = "CLEANSE_CLEANED_DIR", help = "Directory for cleaned chunks")]
    cleaned_dir: Option<PathBuf>,

    #[arg(long, env = "CLEANSE_GARBAGE_DIR", help = "Directory for garbage chunks")]
    garbage_dir: Option<PathBuf>,

    #[arg(long, env = "CLEANSE_MERGED_CLEANED", help = "Merged cleaned output file")]
    merged_cleaned: Option<PathBuf>,

    #[arg(long, env = "CLEANSE_MERGED_GARBAGE", help = "Merged garbage output file")]
    merged_garbage: Option<PathBuf>,

    #[arg(short, long, env = "CLEANSE_PARTITIONS", help = "Number of chunks to split the source into")]
    partitions: Option<usize>,

    #[arg(short, long, help = "Verbose output")]
    verbose: bool,
}

impl Args {
    fn overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            source_path: self.input,
            originals_directory: self.originals_dir,
            cleaned_directory: self.cleaned_dir,
            garbage_directory: self.garbage_dir,
            merged_cleaned_file: self.merged_cleaned,
            merged_garbage_file: self.merged_garbage,
            partition_count: self.partitions,
            verbose: self.verbose,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = if args.config.exists() {
        CleanseConfig::load(&args.config).await?
    } else {
        println!("📄 Config file not found, creating default: {}", args.config.display());
        let default_config = CleanseConfig::default();
        default_config.to_file(&args.config)?;
        default_config
    };
    let config = config.with_overrides(args.overrides())?;

    setup_logging(&config.logging.verbosity)?;

    println!("🧙 Tuonella Cleanse");
    println!("🔍 Input: {}", config.source_path.display());
    println!("📝 Merged cleaned: {}", config.merged_cleaned_file.display());
    println!("📝 Merged garbage: {}", config.merged_garbage_file.display());

    if !config.source_path.is_file() {
        return Err(anyhow::anyhow!("Source file does not exist: {}", config.source_path.display()));
    }

    let mut processor = CleanseProcessor::new(config)?;
    let stats = tokio::task::spawn_blocking(move || processor.process()).await??;

    println!("\n🎉 Cleansing completed successfully! 🎉");
    println!("=======================================");
    println!("📊 Total rows: {}", stats.total_rows);
    println!("📦 Chunks processed: {} ({} rows each)", stats.partitions_processed, stats.chunk_size);
    println!("💥 Malformed rows dropped: {}", stats.malformed_dropped);
    println!("✨ Cleaned rows (merged): {}", stats.merged_cleaned_rows);
    println!("🗑️ Garbage rows (merged): {} ({} of source)",
        stats.merged_garbage_rows,
        format_rate(stats.merged_garbage_rows, stats.total_rows)
    );
    println!("👯 Duplicates removed: {} within chunks, {} across chunks",
        stats.duplicates_dropped, stats.cross_partition_duplicates);
    println!("⏱️ Processing time: {}", format_duration(Duration::from_millis(stats.processing_time_ms)));

    Ok(())
}
