//! Logging configuration and initialization

use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// "json" or anything else for human readable output
    pub format: String,
}

impl LoggingConfig {
    /// Install the global tracing subscriber
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init();
            }
            _ => {
                fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}
