use anyhow::Result;
use colored::Colorize;
use recommender_cf::{render_json, render_text, CompletionSummary, RatingMatrix, ScoreRange};

pub fn print_text(matrix: &RatingMatrix) {
    println!("\n{}", "Predicted matrix:".bold());
    print!("{}", render_text(matrix));
}

pub fn print_json(
    matrix: &RatingMatrix,
    range: &ScoreRange,
    summary: Option<&CompletionSummary>,
) -> Result<()> {
    println!("{}", render_json(matrix, range, summary)?);
    Ok(())
}

/// Summary goes to stderr so stdout stays machine-readable.
pub fn print_summary(summary: &CompletionSummary, range: &ScoreRange) {
    eprintln!(
        "{} {} rated, {} predicted, {} without prediction (scores {}..{})",
        "Summary:".cyan().bold(),
        summary.rated,
        summary.predicted.to_string().green(),
        if summary.undefined > 0 {
            summary.undefined.to_string().yellow()
        } else {
            summary.undefined.to_string().normal()
        },
        range.min,
        range.max
    );
}
