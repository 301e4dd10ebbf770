pub mod format;
pub mod logging;

pub use format::{format_duration, format_rate};
pub use logging::setup_logging;
