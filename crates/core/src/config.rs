//! Shared configuration loading for recommender binaries and libraries
//!
//! Configuration values come from environment variables with the
//! `RECOMMENDER_` prefix, optionally seeded from a `.env` file.
//!
//! Override hierarchy: defaults < .env < environment < command-line flags.
//!
//! # Example
//!
//! ```no_run
//! use recommender_core::config::{load_dotenv, parse_env_var};
//!
//! # fn example() -> Result<(), recommender_core::RecommenderError> {
//! load_dotenv();
//! let neighbors: usize = parse_env_var("RECOMMENDER_NEIGHBORS", 2)?;
//! # Ok(())
//! # }
//! ```

use crate::error::RecommenderError;

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration from
/// environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables
    ///
    /// Missing variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a variable is present but cannot be parsed.
    fn from_env() -> Result<Self, RecommenderError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), RecommenderError>;
}

/// Parse an environment variable into `T`, using `default` when the variable is unset.
///
/// # Errors
///
/// Returns a `ConfigurationError` naming the variable when the value is present
/// but does not parse.
pub fn parse_env_var<T>(key: &str, default: T) -> Result<T, RecommenderError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| RecommenderError::ConfigurationError {
                    message: format!("Failed to parse {}: {}", key, e),
                    key: Some(key.to_string()),
                })
        })
        .unwrap_or(Ok(default))
}

/// Load .env file if present
///
/// Does not return an error if the .env file is not found.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}
