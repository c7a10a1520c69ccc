//! Tracing subscriber setup. Logs go to stderr; stdout carries rendered output.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::CliError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CliError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| CliError::Logging(format!("invalid filter {:?}: {}", config.filter, e)))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| CliError::Logging(e.to_string()))
}
