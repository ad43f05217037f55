//! Matrix completion: neighborhood selection and prediction for every user
//!
//! Each user's neighborhood is computed once from the original ratings and
//! reused for all of that user's missing items. It does not adapt per item.
//! Predictions are written to a new matrix, so later users never see values
//! predicted for earlier ones. Cost is O(U² × I).

use rayon::prelude::*;
use recommender_core::{RecommenderError, Result};

use crate::matrix::{RatingMatrix, Score};
use crate::neighbors::{select_neighbors, Neighborhood};
use crate::CompletionConfig;

/// Fills unrated cells of a [`RatingMatrix`] from each user's neighborhood
#[derive(Debug, Clone)]
pub struct MatrixCompleter {
    config: CompletionConfig,
}

impl MatrixCompleter {
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the neighbor count is zero.
    pub fn new(config: CompletionConfig) -> Result<Self> {
        if config.neighbors == 0 {
            return Err(RecommenderError::invalid_argument(
                "neighbors",
                "0",
                "a positive integer",
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Neighborhood used for every prediction of `user`.
    pub fn neighborhood(&self, matrix: &RatingMatrix, user: usize) -> Result<Neighborhood> {
        select_neighbors(matrix, user, self.config.metric, self.config.neighbors)
    }

    /// Predict a single cell with the same neighborhood the full pass would use.
    ///
    /// Rated cells are predicted too; the stored rating is ignored.
    pub fn predict_cell(&self, matrix: &RatingMatrix, user: usize, item: usize) -> Result<Score> {
        matrix.check_item(item)?;
        let neighborhood = self.neighborhood(matrix, user)?;
        Ok(self
            .config
            .strategy
            .predict(matrix, user, item, &neighborhood))
    }

    /// Return a copy of `matrix` with every unrated cell replaced by a
    /// prediction, or left unrated when no prediction is possible.
    pub fn complete(&self, matrix: &RatingMatrix) -> Result<RatingMatrix> {
        let (num_users, num_items) = matrix.shape();
        let span = tracing::debug_span!(
            "complete",
            users = num_users,
            items = num_items,
            metric = %self.config.metric,
            strategy = %self.config.strategy,
            k = self.config.neighbors,
        );
        let _guard = span.enter();

        let rows: Vec<Vec<Score>> = if self.config.parallel {
            (0..num_users)
                .into_par_iter()
                .map(|user| self.complete_row(matrix, user))
                .collect::<Result<_>>()?
        } else {
            (0..num_users)
                .map(|user| self.complete_row(matrix, user))
                .collect::<Result<_>>()?
        };

        let flat: Vec<Score> = rows.into_iter().flatten().collect();
        let completed = RatingMatrix::from_shape_vec(num_users, num_items, flat)?;

        let missing = matrix.unrated_count();
        let undefined = completed.unrated_count();
        tracing::debug!(
            predicted = missing - undefined,
            undefined,
            "Matrix completion finished"
        );

        Ok(completed)
    }

    fn complete_row(&self, matrix: &RatingMatrix, user: usize) -> Result<Vec<Score>> {
        let row = matrix.row(user);
        if row.iter().all(Option::is_some) {
            return Ok(row.to_vec());
        }

        let neighborhood = self.neighborhood(matrix, user)?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(item, &score)| {
                score.or_else(|| {
                    self.config
                        .strategy
                        .predict(matrix, user, item, &neighborhood)
                })
            })
            .collect())
    }
}
