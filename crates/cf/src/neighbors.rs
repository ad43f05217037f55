//! Top-K neighbor selection

use std::cmp::Ordering;

use recommender_core::Result;
use serde::Serialize;

use crate::matrix::RatingMatrix;
use crate::similarity::SimilarityMetric;

/// A user selected to contribute to another user's predictions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub user: usize,
    pub similarity: f64,
}

/// Neighbors of one target user, ordered by descending similarity.
///
/// Never contains the target user. Ties keep ascending user-index order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Neighborhood {
    target: usize,
    neighbors: Vec<Neighbor>,
}

impl Neighborhood {
    /// Build a neighborhood from precomputed neighbors.
    ///
    /// Entries naming `target` are dropped and the rest are ranked the same way
    /// [`select_neighbors`] ranks them.
    pub fn from_neighbors(target: usize, neighbors: Vec<Neighbor>) -> Self {
        let mut neighbors: Vec<Neighbor> =
            neighbors.into_iter().filter(|n| n.user != target).collect();
        rank(&mut neighbors);
        Self { target, neighbors }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Neighbor> {
        self.neighbors.iter()
    }

    /// Neighbor user indices in rank order.
    pub fn users(&self) -> Vec<usize> {
        self.neighbors.iter().map(|n| n.user).collect()
    }

    pub fn as_slice(&self) -> &[Neighbor] {
        &self.neighbors
    }
}

impl<'a> IntoIterator for &'a Neighborhood {
    type Item = &'a Neighbor;
    type IntoIter = std::slice::Iter<'a, Neighbor>;

    fn into_iter(self) -> Self::IntoIter {
        self.neighbors.iter()
    }
}

/// Rank every other user by similarity to `target` and keep the first `k`.
///
/// Users are excluded by index, so an identical copy of the target is still
/// eligible. If fewer than `k` other users exist, all of them are returned.
///
/// # Errors
///
/// Returns `DimensionMismatch` if `target` is not a row of `matrix`.
pub fn select_neighbors(
    matrix: &RatingMatrix,
    target: usize,
    metric: SimilarityMetric,
    k: usize,
) -> Result<Neighborhood> {
    matrix.check_user(target)?;
    let target_row = matrix.row(target);

    let mut neighbors = Vec::with_capacity(matrix.num_users().saturating_sub(1));
    for (user, row) in matrix.rows().enumerate() {
        if user == target {
            continue;
        }
        let similarity = metric.similarity(target_row, row)?;
        neighbors.push(Neighbor { user, similarity });
    }

    rank(&mut neighbors);
    neighbors.truncate(k);

    tracing::trace!(
        target_user = target,
        metric = %metric,
        neighbors = ?neighbors.iter().map(|n| n.user).collect::<Vec<_>>(),
        "Selected neighborhood"
    );

    Ok(Neighborhood { target, neighbors })
}

/// Descending similarity. The sort is stable, so ties keep their input order.
fn rank(neighbors: &mut [Neighbor]) {
    neighbors.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_neighbors_drops_target_and_ranks() {
        let hood = Neighborhood::from_neighbors(
            1,
            vec![
                Neighbor { user: 0, similarity: 0.2 },
                Neighbor { user: 1, similarity: 1.0 },
                Neighbor { user: 2, similarity: 0.9 },
                Neighbor { user: 3, similarity: 0.2 },
            ],
        );
        assert_eq!(hood.users(), vec![2, 0, 3]);
    }

    fn matrix() -> RatingMatrix {
        RatingMatrix::from_rows(vec![
            vec![Some(5.0), Some(3.0), Some(4.0), None],
            vec![Some(5.0), Some(3.0), Some(4.0), Some(2.0)],
            vec![Some(1.0), Some(5.0), Some(1.0), Some(4.0)],
            vec![Some(4.0), Some(3.0), Some(5.0), Some(3.0)],
        ])
        .unwrap()
    }

    #[test]
    fn test_excludes_target_and_truncates() {
        let m = matrix();
        for metric in SimilarityMetric::ALL {
            for target in 0..m.num_users() {
                let hood = select_neighbors(&m, target, metric, 2).unwrap();
                assert_eq!(hood.target(), target);
                assert_eq!(hood.len(), 2);
                assert!(!hood.users().contains(&target));
            }
        }
    }

    #[test]
    fn test_sorted_descending() {
        let m = matrix();
        let hood = select_neighbors(&m, 0, SimilarityMetric::Euclidean, 3).unwrap();
        let sims: Vec<f64> = hood.iter().map(|n| n.similarity).collect();
        assert!(sims.windows(2).all(|w| w[0] >= w[1]));
        // User 1 agrees exactly with user 0 on every co-rated item.
        assert_eq!(hood.users()[0], 1);
        assert_eq!(hood.as_slice()[0].similarity, 1.0);
    }

    #[test]
    fn test_k_larger_than_other_users() {
        let m = matrix();
        let hood = select_neighbors(&m, 2, SimilarityMetric::Cosine, 10).unwrap();
        assert_eq!(hood.len(), 3);
        assert_eq!(
            {
                let mut users = hood.users();
                users.sort();
                users
            },
            vec![0, 1, 3]
        );
    }

    #[test]
    fn test_ties_keep_ascending_user_order() {
        // Target shares no items with anyone: every similarity is 0.
        let m = RatingMatrix::from_rows(vec![
            vec![Some(3.0), None],
            vec![None, Some(1.0)],
            vec![None, Some(4.0)],
            vec![None, Some(2.0)],
        ])
        .unwrap();
        let hood = select_neighbors(&m, 0, SimilarityMetric::Pearson, 3).unwrap();
        assert_eq!(hood.users(), vec![1, 2, 3]);
    }

    #[test]
    fn test_identical_users_both_eligible() {
        let m = RatingMatrix::from_rows(vec![
            vec![Some(1.0), Some(2.0)],
            vec![Some(1.0), Some(2.0)],
            vec![Some(1.0), Some(2.0)],
        ])
        .unwrap();
        let hood = select_neighbors(&m, 1, SimilarityMetric::Euclidean, 5).unwrap();
        assert_eq!(hood.users(), vec![0, 2]);
    }

    #[test]
    fn test_huge_scores_rank_finite_similarities() {
        let m = RatingMatrix::from_rows(vec![
            vec![Some(1e200), Some(-1e200), None],
            vec![Some(1e200), Some(-1e200), Some(3.0)],
            vec![Some(1.0), None, Some(2.0)],
        ])
        .unwrap();
        for metric in [SimilarityMetric::Pearson, SimilarityMetric::Cosine] {
            let hood = select_neighbors(&m, 0, metric, 2).unwrap();
            assert!(hood.iter().all(|n| n.similarity.is_finite()));
        }
    }

    #[test]
    fn test_unknown_target_is_error() {
        let m = matrix();
        assert!(select_neighbors(&m, 4, SimilarityMetric::Cosine, 1).is_err());
    }

    #[test]
    fn test_k_zero_yields_empty() {
        let m = matrix();
        let hood = select_neighbors(&m, 0, SimilarityMetric::Cosine, 0).unwrap();
        assert!(hood.is_empty());
    }
}
