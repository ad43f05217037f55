//! Utility-matrix text format and output rendering
//!
//! ```text
//! 0.0          <- minimum score
//! 5.0          <- maximum score
//! 5 3 -        <- one line per user, `-` marks an unrated item
//! 4 - 2
//! ```

use std::fs;
use std::path::Path;

use recommender_core::{RecommenderError, Result};
use serde::Serialize;

use crate::matrix::{RatingMatrix, Score, ScoreRange};

const UNRATED_TOKEN: &str = "-";

/// Contents of a utility-matrix file
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityMatrix {
    pub range: ScoreRange,
    pub ratings: RatingMatrix,
}

/// Parse the text format.
///
/// # Errors
///
/// - `Parse` for missing bounds, bad tokens or an empty matrix (1-based line numbers)
/// - `DimensionMismatch` for rows of different lengths
/// - `ScoreOutOfRange` for scores outside the declared bounds
pub fn parse_matrix(input: &str) -> Result<UtilityMatrix> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()));

    let min = parse_bound(lines.next(), 1, "minimum score")?;
    let max = parse_bound(lines.next(), 2, "maximum score")?;
    let range = ScoreRange::new(min, max).map_err(|_| RecommenderError::Parse {
        line: 2,
        message: format!("maximum score {} is below minimum score {}", max, min),
    })?;

    let mut rows = Vec::new();
    let mut width: Option<(usize, usize)> = None;
    for (line_no, line) in lines {
        if line.is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| parse_score(token, line_no))
            .collect::<Result<Vec<Score>>>()?;

        match width {
            None => width = Some((row.len(), line_no)),
            Some((expected, first_line)) if expected != row.len() => {
                return Err(RecommenderError::DimensionMismatch {
                    expected: format!("{} items (as on line {})", expected, first_line),
                    actual: format!("{} items on line {}", row.len(), line_no),
                });
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(RecommenderError::Parse {
            line: 3,
            message: "no user rows found".to_string(),
        });
    }

    let ratings = RatingMatrix::from_rows(rows)?;
    ratings.validate_range(&range)?;

    tracing::debug!(
        users = ratings.num_users(),
        items = ratings.num_items(),
        rated = ratings.rated_count(),
        "Parsed utility matrix"
    );

    Ok(UtilityMatrix { range, ratings })
}

/// Read and parse a utility-matrix file.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<UtilityMatrix> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Loading utility matrix");
    let contents = fs::read_to_string(path)?;
    parse_matrix(&contents)
}

fn parse_bound(line: Option<(usize, &str)>, line_no: usize, what: &str) -> Result<f64> {
    let (line_no, text) = line.ok_or_else(|| RecommenderError::Parse {
        line: line_no,
        message: format!("missing {}", what),
    })?;
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RecommenderError::Parse {
            line: line_no,
            message: format!("invalid {} {:?}", what, text),
        })
}

fn parse_score(token: &str, line_no: usize) -> Result<Score> {
    if token == UNRATED_TOKEN {
        return Ok(None);
    }
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| RecommenderError::Parse {
            line: line_no,
            message: format!("invalid score {:?}", token),
        })
}

/// One row per user, one decimal place per score, `-` for unrated cells.
pub fn render_text(matrix: &RatingMatrix) -> String {
    let mut out = String::new();
    for row in matrix.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|score| match score {
                Some(v) => format!("{:.1}", v),
                None => UNRATED_TOKEN.to_string(),
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// Cell counts of a completed matrix relative to its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionSummary {
    /// Cells rated in the source matrix
    pub rated: usize,
    /// Unrated cells that received a prediction
    pub predicted: usize,
    /// Unrated cells still without a prediction
    pub undefined: usize,
}

impl CompletionSummary {
    pub fn compare(original: &RatingMatrix, completed: &RatingMatrix) -> Self {
        let rated = original.rated_count();
        let undefined = completed.unrated_count();
        Self {
            rated,
            predicted: original.unrated_count().saturating_sub(undefined),
            undefined,
        }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(flatten)]
    range: &'a ScoreRange,
    rows: Vec<Vec<Score>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a CompletionSummary>,
}

/// JSON document `{ "min", "max", "rows", "summary"? }` with `null` for
/// unrated cells.
pub fn render_json(
    matrix: &RatingMatrix,
    range: &ScoreRange,
    summary: Option<&CompletionSummary>,
) -> Result<String> {
    let document = JsonDocument {
        range,
        rows: matrix.to_rows(),
        summary,
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| RecommenderError::Serialization(e.to_string()))
}
