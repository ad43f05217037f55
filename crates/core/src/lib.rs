//! # Recommender Core
//!
//! Shared building blocks for the recommender workspace.
//!
//! ## Modules
//!
//! - `error`: Error types shared by the library crates
//! - `config`: Environment-driven configuration loading and validation
//! - `observability`: Structured logging initialisation

pub mod config;
pub mod error;
pub mod observability;

pub use config::{load_dotenv, parse_env_var, ConfigLoader};
pub use error::RecommenderError;
pub use observability::{init_logging, LogConfig, LogFormat, ObservabilityError};

/// Result type alias for recommender operations
pub type Result<T> = std::result::Result<T, RecommenderError>;
