//! Logging Setup
//!
//! Installs the global tracing subscriber from [`LoggingConfig`].
//! Log lines go to stderr (or the configured file) so command output on
//! stdout stays clean.

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {error}")]
    OpenFile { path: String, error: String },

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Build the filter: `RUST_LOG` wins, else `edumentor=<level>`
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("edumentor={}", config.level)))
}

/// Initialize global logging
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let json = config.format.eq_ignore_ascii_case("json");

    let file = match &config.file {
        Some(path) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| LoggingError::OpenFile {
                    path: path.clone(),
                    error: e.to_string(),
                })?,
        ),
        None => None,
    };

    let registry = tracing_subscriber::registry().with(build_filter(config));

    let result = match (json, file) {
        (true, Some(file)) => registry
            .with(fmt::layer().json().with_writer(Mutex::new(file)))
            .try_init(),
        (true, None) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        (false, Some(file)) => registry
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .try_init(),
        (false, None) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritable_log_file() {
        let config = LoggingConfig {
            file: Some("/nonexistent-dir/edumentor.log".into()),
            ..LoggingConfig::default()
        };

        let err = init(&config).unwrap_err();
        assert!(matches!(err, LoggingError::OpenFile { .. }));
    }
}
