use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use recommender_cf::{load_matrix, CompletionConfig, CompletionSummary, MatrixCompleter};
use recommender_core::{init_logging, load_dotenv, ConfigLoader, LogConfig};
use std::path::PathBuf;
use tracing::info;

mod output;

#[derive(Parser)]
#[command(name = "recommender")]
#[command(
    about = "Predict missing ratings in a utility matrix with user-based collaborative filtering",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[arg(help = "Path to the utility matrix file")]
    file: PathBuf,

    #[arg(long, help = "Similarity metric: pearson, cosine or euclidean")]
    metric: Option<String>,

    #[arg(short = 'k', long, help = "Number of neighbors to consider")]
    neighbors: Option<usize>,

    #[arg(long, help = "Prediction strategy: simple or mean-centered")]
    prediction: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help = "Output format")]
    format: OutputFormat,

    #[arg(long, help = "Process users in parallel")]
    parallel: bool,

    #[arg(long, help = "Report how many cells were predicted or left unrated")]
    summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    load_dotenv();

    let cli = Cli::parse();

    let log_config = LogConfig::from_env().context("Failed to load logging configuration")?;
    init_logging(&log_config).context("Failed to initialize logging")?;

    let config = resolve_config(&cli)?;
    let completer = MatrixCompleter::new(config)?;

    let utility = load_matrix(&cli.file)
        .with_context(|| format!("Failed to load utility matrix from {}", cli.file.display()))?;

    info!(
        users = utility.ratings.num_users(),
        items = utility.ratings.num_items(),
        metric = %config.metric,
        neighbors = config.neighbors,
        strategy = %config.strategy,
        "Completing utility matrix"
    );

    let completed = completer.complete(&utility.ratings)?;
    let summary = CompletionSummary::compare(&utility.ratings, &completed);

    match cli.format {
        OutputFormat::Text => {
            output::print_text(&completed);
            if cli.summary {
                output::print_summary(&summary, &utility.range);
            }
        }
        OutputFormat::Json => {
            let summary = cli.summary.then_some(&summary);
            output::print_json(&completed, &utility.range, summary)?;
        }
    }

    Ok(())
}

/// Flags override environment values, which override defaults.
fn resolve_config(cli: &Cli) -> Result<CompletionConfig> {
    let mut config = CompletionConfig::from_env()?;

    if let Some(metric) = &cli.metric {
        config.metric = metric.parse()?;
    }
    if let Some(neighbors) = cli.neighbors {
        config.neighbors = neighbors;
    }
    if let Some(prediction) = &cli.prediction {
        config.strategy = prediction.parse()?;
    }
    config.parallel |= cli.parallel;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recommender_cf::{PredictionStrategy, SimilarityMetric};

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "recommender",
            "ratings.txt",
            "--metric",
            "cosine",
            "-k",
            "3",
            "--prediction",
            "mean-centered",
            "--format",
            "json",
            "--summary",
        ])
        .unwrap();

        assert_eq!(cli.file, PathBuf::from("ratings.txt"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.summary);

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.metric, SimilarityMetric::Cosine);
        assert_eq!(config.neighbors, 3);
        assert_eq!(config.strategy, PredictionStrategy::MeanCentered);
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let cli = Cli::try_parse_from(["recommender", "ratings.txt", "--metric", "jaccard"])
            .unwrap();
        let err = resolve_config(&cli).unwrap_err();
        assert!(err.to_string().contains("jaccard"));
    }

    #[test]
    fn test_zero_neighbors_is_rejected() {
        let cli = Cli::try_parse_from(["recommender", "ratings.txt", "-k", "0"]).unwrap();
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn test_file_argument_required() {
        assert!(Cli::try_parse_from(["recommender"]).is_err());
    }
}
