//! Log subscriber setup for the binary.

use reelcast_error::{ConfigError, ReelcastResult};
use tracing_subscriber::EnvFilter;

/// How log lines are filtered and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset (e.g. "info", "reelcast=debug")
    pub level: String,
    /// Emit one JSON object per line
    pub json: bool,
}

impl LoggingConfig {
    /// `info`, or `debug` when verbose.
    pub fn new(verbose: bool) -> Self {
        Self {
            level: if verbose { "debug" } else { "info" }.to_string(),
            json: false,
        }
    }

    /// Enable JSON-formatted logs.
    pub fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// `RUST_LOG` wins over the configured level.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> ReelcastResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(false);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| ConfigError::new(format!("Failed to install logger: {}", e)))?;
    Ok(())
}
