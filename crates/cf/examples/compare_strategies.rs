//! Complete the bundled sample matrix with every metric/strategy pair.
//!
//! Run with: cargo run -p recommender-cf --example compare_strategies

use recommender_cf::{
    parse_matrix, render_text, CompletionConfig, CompletionSummary, MatrixCompleter,
    PredictionStrategy, SimilarityMetric,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let utility = parse_matrix(include_str!("../../../data/sample_ratings.txt"))?;

    for metric in SimilarityMetric::ALL {
        for strategy in PredictionStrategy::ALL {
            let completer = MatrixCompleter::new(CompletionConfig {
                metric,
                neighbors: 2,
                strategy,
                parallel: false,
            })?;
            let completed = completer.complete(&utility.ratings)?;
            let summary = CompletionSummary::compare(&utility.ratings, &completed);

            println!(
                "== {} / {} ({} predicted, {} undefined)",
                metric, strategy, summary.predicted, summary.undefined
            );
            print!("{}", render_text(&completed));
        }
    }

    Ok(())
}
