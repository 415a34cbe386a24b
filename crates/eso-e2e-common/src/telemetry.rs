//! Logging initialization for fixture runs
//!
//! Installs a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`
//! (default `info`). Safe to call from every test: only the first call
//! installs a subscriber.

use tracing_subscriber::EnvFilter;

/// Output format for log lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Plain,
    /// JSON structured output, one object per line
    Json,
}

impl LogFormat {
    /// Parse a format name, falling back to `Plain` for anything unknown
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Plain,
        }
    }
}

/// Initialize logging (crypto provider + tracing)
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(format: LogFormat) -> bool {
    crate::install_crypto_provider();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer();

    match format {
        LogFormat::Plain => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}
