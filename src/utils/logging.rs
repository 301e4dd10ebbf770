use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

pub fn verbosity_level(verbosity: &str) -> Level {
    match verbosity {
        "silent" => Level::ERROR,
        "normal" => Level::INFO,
        "verbose" => Level::DEBUG,
        _ => Level::INFO,
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` directives are applied on top.
pub fn setup_logging(verbosity: &str) -> Result<()> {
    let level = verbosity_level(verbosity);

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("tuonella_cleanse={}", level).parse()?);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
