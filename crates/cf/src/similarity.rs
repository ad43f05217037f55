//! User-user similarity metrics
//!
//! Every metric only looks at the items both users have rated. An empty
//! intersection, zero variance or zero norm yields a neutral similarity of 0.

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use recommender_core::{RecommenderError, Result};
use serde::{Deserialize, Serialize};

use crate::matrix::Score;

/// Similarity metric between two users' rating vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Pearson correlation, in [-1, 1]
    Pearson,
    /// Cosine of the angle between the co-rated sub-vectors, in [-1, 1]
    Cosine,
    /// `1 / (1 + d)` where `d` is the Euclidean distance, in (0, 1]
    Euclidean,
}

impl SimilarityMetric {
    pub const ALL: [SimilarityMetric; 3] = [
        SimilarityMetric::Pearson,
        SimilarityMetric::Cosine,
        SimilarityMetric::Euclidean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::Pearson => "pearson",
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Euclidean => "euclidean",
        }
    }

    /// Similarity of two rating vectors of equal length.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the vectors differ in length.
    pub fn similarity(&self, a: ArrayView1<'_, Score>, b: ArrayView1<'_, Score>) -> Result<f64> {
        if a.len() != b.len() {
            return Err(RecommenderError::DimensionMismatch {
                expected: format!("{} items", a.len()),
                actual: format!("{} items", b.len()),
            });
        }

        let pairs = co_rated(a, b);
        if pairs.is_empty() {
            return Ok(0.0);
        }

        let value = match self {
            SimilarityMetric::Pearson => pearson(&pairs),
            SimilarityMetric::Cosine => cosine(&pairs),
            SimilarityMetric::Euclidean => euclidean(&pairs),
        };

        // Overflowing accumulators (inf / inf) count as degenerate.
        Ok(if value.is_finite() { value } else { 0.0 })
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMetric {
    type Err = RecommenderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(SimilarityMetric::Pearson),
            "cosine" => Ok(SimilarityMetric::Cosine),
            "euclidean" => Ok(SimilarityMetric::Euclidean),
            _ => Err(RecommenderError::invalid_argument(
                "metric",
                s,
                "pearson|cosine|euclidean",
            )),
        }
    }
}

/// Pairs `(a[i], b[i])` for every item rated in both vectors, in item order.
pub fn co_rated(a: ArrayView1<'_, Score>, b: ArrayView1<'_, Score>) -> Vec<(f64, f64)> {
    a.iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect()
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0_f64;
    let mut var_a = 0.0_f64;
    let mut var_b = 0.0_f64;
    for (x, y) in pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denominator = var_a.sqrt() * var_b.sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        covariance / denominator
    }
}

fn cosine(pairs: &[(f64, f64)]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in pairs {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let (norm_a, norm_b) = (norm_a.sqrt(), norm_b.sqrt());
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn euclidean(pairs: &[(f64, f64)]) -> f64 {
    let distance = pairs
        .iter()
        .map(|(x, y)| (x - y) * (x - y))
        .fold(0.0_f64, |acc, d| acc + d)
        .sqrt();
    1.0 / (1.0 + distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    const EPS: f64 = 1e-9;

    fn sim(metric: SimilarityMetric, a: &[Score], b: &[Score]) -> f64 {
        metric
            .similarity(arr1(a).view(), arr1(b).view())
            .unwrap()
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!(
            "pearson".parse::<SimilarityMetric>().unwrap(),
            SimilarityMetric::Pearson
        );
        assert_eq!(
            "Cosine".parse::<SimilarityMetric>().unwrap(),
            SimilarityMetric::Cosine
        );
        assert_eq!(
            " euclidean ".parse::<SimilarityMetric>().unwrap(),
            SimilarityMetric::Euclidean
        );
        let err = "manhattan".parse::<SimilarityMetric>().unwrap_err();
        assert!(matches!(err, RecommenderError::InvalidArgument { .. }));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for metric in SimilarityMetric::ALL {
            assert_eq!(metric.to_string().parse::<SimilarityMetric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_pearson_known_values() {
        let a = [Some(1.0), Some(2.0), Some(3.0)];
        let b = [Some(2.0), Some(4.0), Some(6.0)];
        let c = [Some(3.0), Some(2.0), Some(1.0)];
        assert!((sim(SimilarityMetric::Pearson, &a, &b) - 1.0).abs() < EPS);
        assert!((sim(SimilarityMetric::Pearson, &a, &c) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_pearson_restricted_to_intersection() {
        // Item 1 is only rated by `a`, so it must not influence the result.
        let a = [Some(1.0), Some(100.0), Some(2.0), Some(3.0)];
        let b = [Some(1.0), None, Some(2.0), Some(3.0)];
        assert!((sim(SimilarityMetric::Pearson, &a, &b) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_pearson_flat_ratings_are_neutral() {
        let a = [Some(3.0), Some(3.0), Some(3.0)];
        let b = [Some(1.0), Some(4.0), Some(5.0)];
        assert_eq!(sim(SimilarityMetric::Pearson, &a, &b), 0.0);
    }

    #[test]
    fn test_cosine_known_values() {
        let a = [Some(5.0), Some(3.0), None];
        let b = [Some(4.0), None, Some(2.0)];
        // Only item 0 is shared: both sub-vectors are positive scalars.
        assert!((sim(SimilarityMetric::Cosine, &a, &b) - 1.0).abs() < EPS);

        let c = [Some(1.0), Some(0.0)];
        let d = [Some(0.0), Some(1.0)];
        assert!(sim(SimilarityMetric::Cosine, &c, &d).abs() < EPS);
    }

    #[test]
    fn test_cosine_zero_norm_is_neutral() {
        let a = [Some(0.0), Some(0.0)];
        let b = [Some(1.0), Some(2.0)];
        assert_eq!(sim(SimilarityMetric::Cosine, &a, &b), 0.0);
    }

    #[test]
    fn test_euclidean_known_values() {
        let a = [Some(1.0), Some(1.0)];
        let b = [Some(4.0), Some(5.0)];
        // distance = sqrt(9 + 16) = 5
        assert!((sim(SimilarityMetric::Euclidean, &a, &b) - 1.0 / 6.0).abs() < EPS);
        assert_eq!(sim(SimilarityMetric::Euclidean, &a, &a), 1.0);
    }

    #[test]
    fn test_empty_intersection_is_neutral() {
        let a = [Some(1.0), None];
        let b = [None, Some(2.0)];
        for metric in SimilarityMetric::ALL {
            assert_eq!(sim(metric, &a, &b), 0.0);
        }
    }

    #[test]
    fn test_overflow_is_neutral() {
        let a = [Some(1e200), Some(-1e200)];
        let b = [Some(1e200), Some(-1e200)];
        assert_eq!(sim(SimilarityMetric::Pearson, &a, &b), 0.0);
        assert_eq!(sim(SimilarityMetric::Cosine, &a, &b), 0.0);
        assert_eq!(sim(SimilarityMetric::Euclidean, &a, &b), 1.0);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let a = arr1(&[Some(1.0), None]);
        let b = arr1(&[Some(1.0)]);
        let result = SimilarityMetric::Cosine.similarity(a.view(), b.view());
        assert!(matches!(
            result,
            Err(RecommenderError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_symmetry() {
        let a = [Some(5.0), Some(3.0), None, Some(1.0), Some(2.5)];
        let b = [Some(4.0), None, Some(2.0), Some(2.0), Some(4.5)];
        for metric in SimilarityMetric::ALL {
            assert_eq!(sim(metric, &a, &b), sim(metric, &b, &a), "{}", metric);
        }
    }

    #[test]
    fn test_self_similarity_is_maximal() {
        let a = [Some(5.0), Some(3.0), None, Some(1.0)];
        for metric in SimilarityMetric::ALL {
            assert!((sim(metric, &a, &a) - 1.0).abs() < EPS, "{}", metric);
        }
    }
}
