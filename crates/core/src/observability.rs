//! Structured logging initialisation
//!
//! Logs go to stderr so that stdout stays reserved for command output.

use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{parse_env_var, ConfigLoader};
use crate::error::RecommenderError;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid log filter {0:?}: {1}")]
    InvalidFilter(String, String),
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, single line per event
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(RecommenderError::invalid_argument(
                "log_format",
                other,
                "pretty|json",
            )),
        }
    }
}

/// Logging configuration
///
/// # Environment Variables
///
/// - `RECOMMENDER_LOG_LEVEL` (optional): default filter directive (default: `warn`)
/// - `RECOMMENDER_LOG_FORMAT` (optional): `pretty` or `json` (default: `pretty`)
///
/// `RUST_LOG` takes precedence over `RECOMMENDER_LOG_LEVEL` when set.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl ConfigLoader for LogConfig {
    fn from_env() -> Result<Self, RecommenderError> {
        let defaults = LogConfig::default();
        let level = parse_env_var("RECOMMENDER_LOG_LEVEL", defaults.level)?;
        let format = std::env::var("RECOMMENDER_LOG_FORMAT")
            .ok()
            .map(|v| v.parse::<LogFormat>())
            .transpose()
            .map_err(|e| RecommenderError::ConfigurationError {
                message: e.to_string(),
                key: Some("RECOMMENDER_LOG_FORMAT".to_string()),
            })?
            .unwrap_or(defaults.format);

        Ok(Self { level, format })
    }

    fn validate(&self) -> Result<(), RecommenderError> {
        EnvFilter::try_new(&self.level).map_err(|e| RecommenderError::ConfigurationError {
            message: format!("Invalid log level {:?}: {}", self.level, e),
            key: Some("RECOMMENDER_LOG_LEVEL".to_string()),
        })?;
        Ok(())
    }
}

/// Install the global tracing subscriber.
///
/// Must be called at most once per process.
pub fn init_logging(config: &LogConfig) -> Result<(), ObservabilityError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| ObservabilityError::InvalidFilter(config.level.clone(), e.to_string()))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
    .map_err(|e| ObservabilityError::SubscriberInit(e.to_string()))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_config_invalid_level() {
        let config = LogConfig {
            level: "recommender=loud".to_string(),
            format: LogFormat::Json,
        };
        assert!(config.validate().is_err());
    }
}
