//! Prediction CLI
//!
//! Loads a saved pipeline and a single JSON survey record, scores it, and
//! prints the result object as one JSON line on stdout. Diagnostics go to
//! stderr; any failure exits with status 1.
use carboncast::errors::CarbonError;
use carboncast::serve::{load_record, score_record};
use carboncast::Pipeline;
use clap::Parser;
use env_logger::Env;
use log::info;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "predict")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Make predictions using a trained carbon emission model", long_about = None)]
struct Args {
    /// Path to JSON file with input data
    #[arg(long)]
    input: PathBuf,

    /// Path to the saved model file
    #[arg(long)]
    model: PathBuf,
}

fn run(args: &Args) -> Result<Value, CarbonError> {
    let pipeline = Pipeline::load(&args.model.to_string_lossy())?;
    let record = load_record(&args.input)?;
    info!("input data: {}", Value::Object(record.clone()));
    score_record(&pipeline, &record)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(result) => {
            println!("{}", result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error during prediction: {}", e);
            ExitCode::FAILURE
        }
    }
}
