//! Training CLI
//!
//! Loads the survey CSV, trains both candidate models, reports their
//! held-out metrics, and saves the winning pipeline plus a feature
//! importance chart.
use carboncast::data::load_dataset;
use carboncast::errors::CarbonError;
use carboncast::importance::{feature_importance, render_bar_chart, CHART_PATH};
use carboncast::trainer::train_and_select;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train a carbon emission prediction model", long_about = None)]
struct Args {
    /// Path to the CSV dataset
    #[arg(long)]
    data: PathBuf,

    /// Output path for the saved model
    #[arg(long, default_value = "model.json")]
    output: PathBuf,
}

fn main() -> Result<(), CarbonError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    println!("Loading data...");
    let (frame, y) = load_dataset(&args.data)?;
    println!("Dataset shape: ({}, {})", frame.n_rows, frame.n_cols() + 1);

    println!("Training models...");
    let outcome = train_and_select(&frame, &y)?;

    let winner = outcome.pipeline.estimator.name();
    let winner_r2 = outcome
        .reports
        .iter()
        .find(|c| c.name == winner)
        .map(|c| c.report.r2)
        .unwrap_or(f64::NAN);
    println!("\nBest model: {} with R² score of {:.2}", winner, winner_r2);

    println!("\nAnalyzing feature importance...");
    match feature_importance(&outcome.pipeline) {
        Some(report) => {
            render_bar_chart(&report, winner, CHART_PATH)?;
            println!("Feature importance plot saved as '{}'", CHART_PATH);
            println!("\nTop 10 most important features:");
            for (name, score) in report.top(10) {
                println!("  {:<45} {:.4}", name, score);
            }
        }
        None => println!("Feature importance analysis not available for this model type."),
    }

    let output = args.output.to_string_lossy();
    outcome.pipeline.save(&output)?;
    println!("Model saved to {}", output);

    Ok(())
}
