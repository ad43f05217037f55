//! Rating prediction strategies
//!
//! Both strategies combine the ratings of neighbors who rated the target item,
//! weighted by similarity. Neighbors without a rating for the item contribute
//! to neither the numerator nor the denominator.

use std::fmt;
use std::str::FromStr;

use recommender_core::RecommenderError;
use serde::{Deserialize, Serialize};

use crate::matrix::{RatingMatrix, Score};
use crate::neighbors::Neighborhood;

/// How a missing rating is estimated from a neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionStrategy {
    /// `Σ sim·r / Σ |sim|`
    Simple,
    /// `mean(u) + Σ sim·(r − mean(v)) / Σ |sim|`
    MeanCentered,
}

impl PredictionStrategy {
    pub const ALL: [PredictionStrategy; 2] =
        [PredictionStrategy::Simple, PredictionStrategy::MeanCentered];

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionStrategy::Simple => "simple",
            PredictionStrategy::MeanCentered => "mean-centered",
        }
    }

    /// Estimate `user`'s rating of `item` from `neighborhood`.
    ///
    /// Returns `None` when no neighbor rated the item or every contributing
    /// similarity is zero. The result is not clamped to the score range.
    pub fn predict(
        &self,
        matrix: &RatingMatrix,
        user: usize,
        item: usize,
        neighborhood: &Neighborhood,
    ) -> Score {
        match self {
            PredictionStrategy::Simple => predict_simple(matrix, item, neighborhood),
            PredictionStrategy::MeanCentered => {
                predict_mean_centered(matrix, user, item, neighborhood)
            }
        }
    }
}

impl fmt::Display for PredictionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictionStrategy {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(PredictionStrategy::Simple),
            "mean-centered" | "mean_centered" | "mean" => Ok(PredictionStrategy::MeanCentered),
            _ => Err(RecommenderError::invalid_argument(
                "prediction",
                s,
                "simple|mean-centered",
            )),
        }
    }
}

fn predict_simple(matrix: &RatingMatrix, item: usize, neighborhood: &Neighborhood) -> Score {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for neighbor in neighborhood {
        if let Some(rating) = matrix.get(neighbor.user, item) {
            numerator += neighbor.similarity * rating;
            denominator += neighbor.similarity.abs();
        }
    }

    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

fn predict_mean_centered(
    matrix: &RatingMatrix,
    user: usize,
    item: usize,
    neighborhood: &Neighborhood,
) -> Score {
    let user_mean = matrix.user_mean(user)?;
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for neighbor in neighborhood {
        let rating = match matrix.get(neighbor.user, item) {
            Some(rating) => rating,
            None => continue,
        };
        // A neighbor with a rating always has a mean.
        let neighbor_mean = matrix.user_mean(neighbor.user).unwrap_or(rating);
        numerator += neighbor.similarity * (rating - neighbor_mean);
        denominator += neighbor.similarity.abs();
    }

    if denominator == 0.0 {
        None
    } else {
        Some(user_mean + numerator / denominator)
    }
}
