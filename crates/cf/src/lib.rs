//! Memory-based collaborative filtering
//!
//! Predicts the missing entries of a user × item rating matrix: every user is
//! compared with every other user, the top-K most similar users form the
//! neighborhood, and each unrated item is imputed from the neighborhood's
//! ratings.
//!
//! ```
//! use recommender_cf::{complete_matrix, RatingMatrix};
//!
//! let ratings = RatingMatrix::from_rows(vec![
//!     vec![Some(5.0), Some(3.0), None],
//!     vec![Some(4.0), None, Some(2.0)],
//!     vec![None, Some(4.0), Some(5.0)],
//! ])
//! .unwrap();
//!
//! let completed = complete_matrix(&ratings, "cosine", 1, "simple").unwrap();
//! assert_eq!(completed.get(0, 2), Some(2.0));
//! ```

pub mod completion;
pub mod format;
pub mod matrix;
pub mod neighbors;
pub mod prediction;
pub mod similarity;

pub use completion::MatrixCompleter;
pub use format::{
    load_matrix, parse_matrix, render_json, render_text, CompletionSummary, UtilityMatrix,
};
pub use matrix::{RatingMatrix, Score, ScoreRange};
pub use neighbors::{select_neighbors, Neighbor, Neighborhood};
pub use prediction::PredictionStrategy;
pub use similarity::SimilarityMetric;

use recommender_core::config::{parse_env_var, ConfigLoader};
use recommender_core::{RecommenderError, Result};

/// Completion parameters
///
/// # Environment Variables
///
/// - `RECOMMENDER_METRIC` (optional): `pearson`, `cosine` or `euclidean` (default: `pearson`)
/// - `RECOMMENDER_NEIGHBORS` (optional): neighborhood size K (default: 2)
/// - `RECOMMENDER_PREDICTION` (optional): `simple` or `mean-centered` (default: `simple`)
/// - `RECOMMENDER_PARALLEL` (optional): process users on the rayon pool (default: false)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionConfig {
    pub metric: SimilarityMetric,
    /// Neighborhood size (K)
    pub neighbors: usize,
    pub strategy: PredictionStrategy,
    /// Process users in parallel. Output is identical either way.
    pub parallel: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            metric: SimilarityMetric::Pearson,
            neighbors: 2,
            strategy: PredictionStrategy::Simple,
            parallel: false,
        }
    }
}

impl ConfigLoader for CompletionConfig {
    fn from_env() -> Result<Self> {
        let defaults = CompletionConfig::default();
        let config = Self {
            metric: parse_identifier("RECOMMENDER_METRIC", defaults.metric)?,
            neighbors: parse_env_var("RECOMMENDER_NEIGHBORS", defaults.neighbors)?,
            strategy: parse_identifier("RECOMMENDER_PREDICTION", defaults.strategy)?,
            parallel: parse_env_var("RECOMMENDER_PARALLEL", defaults.parallel)?,
        };
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(RecommenderError::ConfigurationError {
                message: "neighbors must be greater than 0".to_string(),
                key: Some("RECOMMENDER_NEIGHBORS".to_string()),
            });
        }
        Ok(())
    }
}

/// Metric and strategy names keep their `InvalidArgument` error when read
/// from the environment.
fn parse_identifier<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr<Err = RecommenderError>,
{
    std::env::var(key)
        .ok()
        .map(|v| v.parse::<T>())
        .transpose()
        .map(|value| value.unwrap_or(default))
}

/// Complete `matrix` with string-identified parameters.
///
/// Identifiers are resolved before any computation, so an unknown metric or
/// strategy fails with `InvalidArgument` and produces no output.
pub fn complete_matrix(
    matrix: &RatingMatrix,
    metric: &str,
    neighbors: usize,
    strategy: &str,
) -> Result<RatingMatrix> {
    let config = CompletionConfig {
        metric: metric.parse()?,
        neighbors,
        strategy: strategy.parse()?,
        parallel: false,
    };
    MatrixCompleter::new(config)?.complete(matrix)
}
