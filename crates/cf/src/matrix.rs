//! Dense user-item rating matrix
//!
//! Rows are users, columns are items. Every cell is a [`Score`]: either a rating
//! or `None` for an item the user has not rated yet.

use ndarray::{Array2, ArrayView1, Axis};
use recommender_core::{RecommenderError, Result};
use serde::{Deserialize, Serialize};

/// A single cell of the utility matrix. `None` means "unrated".
pub type Score = Option<f64>;

/// Bounds of valid input scores.
///
/// Only used to validate and display input; predictions are never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(RecommenderError::invalid_argument(
                "score_range",
                format!("[{}, {}]", min, max),
                "finite bounds with min <= max",
            ));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Partially observed user × item rating matrix.
///
/// Dimensions are fixed at construction. The matrix is never mutated by the
/// completion pass; predictions are written to a separate copy.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    cells: Array2<Score>,
}

impl RatingMatrix {
    /// Build a matrix from user rows.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if rows have different lengths
    /// - `InvalidArgument` if a score is NaN or infinite
    pub fn from_rows(rows: Vec<Vec<Score>>) -> Result<Self> {
        let num_users = rows.len();
        let num_items = rows.first().map(Vec::len).unwrap_or(0);

        let mut flat = Vec::with_capacity(num_users * num_items);
        for (user, row) in rows.into_iter().enumerate() {
            if row.len() != num_items {
                return Err(RecommenderError::DimensionMismatch {
                    expected: format!("{} items in row {}", num_items, user),
                    actual: format!("{} items", row.len()),
                });
            }
            for (item, score) in row.into_iter().enumerate() {
                if let Some(value) = score {
                    if !value.is_finite() {
                        return Err(RecommenderError::invalid_argument(
                            format!("score[{}][{}]", user, item),
                            value.to_string(),
                            "a finite number",
                        ));
                    }
                }
                flat.push(score);
            }
        }

        Self::from_shape_vec(num_users, num_items, flat)
    }

    pub(crate) fn from_shape_vec(
        num_users: usize,
        num_items: usize,
        flat: Vec<Score>,
    ) -> Result<Self> {
        let cells = Array2::from_shape_vec((num_users, num_items), flat).map_err(|e| {
            RecommenderError::DimensionMismatch {
                expected: format!("{}x{}", num_users, num_items),
                actual: e.to_string(),
            }
        })?;
        Ok(Self { cells })
    }

    pub fn num_users(&self) -> usize {
        self.cells.nrows()
    }

    pub fn num_items(&self) -> usize {
        self.cells.ncols()
    }

    /// `(users, items)`
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Score at `(user, item)`; `None` if unrated or out of bounds.
    pub fn get(&self, user: usize, item: usize) -> Score {
        self.cells.get((user, item)).copied().flatten()
    }

    /// Full rating vector of one user.
    ///
    /// # Panics
    ///
    /// Panics if `user` is out of bounds.
    pub fn row(&self, user: usize) -> ArrayView1<'_, Score> {
        self.cells.row(user)
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Score>> {
        self.cells.axis_iter(Axis(0))
    }

    /// Mean over the user's rated items, ignoring unrated cells.
    ///
    /// `None` when the user has rated nothing.
    pub fn user_mean(&self, user: usize) -> Option<f64> {
        if user >= self.num_users() {
            return None;
        }
        let (sum, count) = self
            .row(user)
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Score pairs of two users over the items both have rated.
    pub fn co_rated(&self, a: usize, b: usize) -> Vec<(f64, f64)> {
        if a >= self.num_users() || b >= self.num_users() {
            return Vec::new();
        }
        crate::similarity::co_rated(self.row(a), self.row(b))
    }

    pub fn rated_count(&self) -> usize {
        self.cells.iter().filter(|s| s.is_some()).count()
    }

    pub fn unrated_count(&self) -> usize {
        self.cells.len() - self.rated_count()
    }

    /// True when no cell is unrated.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Check every rated cell against `range`.
    pub fn validate_range(&self, range: &ScoreRange) -> Result<()> {
        for ((row, col), score) in self.cells.indexed_iter() {
            if let Some(value) = *score {
                if !range.contains(value) {
                    return Err(RecommenderError::ScoreOutOfRange {
                        row,
                        col,
                        value,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn to_rows(&self) -> Vec<Vec<Score>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    pub(crate) fn check_user(&self, user: usize) -> Result<()> {
        if user >= self.num_users() {
            return Err(RecommenderError::DimensionMismatch {
                expected: format!("user index < {}", self.num_users()),
                actual: user.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_item(&self, item: usize) -> Result<()> {
        if item >= self.num_items() {
            return Err(RecommenderError::DimensionMismatch {
                expected: format!("item index < {}", self.num_items()),
                actual: item.to_string(),
            });
        }
        Ok(())
    }
}
