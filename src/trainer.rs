//! Training driver
//!
//! Splits the dataset, fits both candidate pipelines in a fixed order, prints
//! each one's held-out metrics, and keeps the pipeline with the strictly
//! higher R². On a tie the first-evaluated candidate (the random forest)
//! wins, because the later one must beat it outright to displace it.
use crate::boosting::GradientBoostingRegressor;
use crate::data::Frame;
use crate::errors::CarbonError;
use crate::forest::RandomForestRegressor;
use crate::metrics::RegressionReport;
use crate::model_selection::train_test_split;
use crate::pipeline::{Estimator, Pipeline};
use log::info;

/// Fraction of rows held out for evaluation.
pub const TEST_SIZE: f64 = 0.2;
/// Seed shared by the split and both estimators.
pub const SEED: u64 = 42;
/// Trees per ensemble.
pub const N_ESTIMATORS: usize = 100;

/// Held-out evaluation of one fitted candidate.
#[derive(Debug, Clone)]
pub struct CandidateReport {
    pub name: &'static str,
    pub report: RegressionReport,
}

/// The result of a training run.
pub struct TrainingOutcome {
    /// The winning pipeline.
    pub pipeline: Pipeline,
    /// Held-out metrics for every candidate, in evaluation order.
    pub reports: Vec<CandidateReport>,
}

/// Index of the winner under the strictly-greater R² rule.
///
/// A NaN score never beats a real one; between two NaNs the earlier
/// candidate stands.
pub fn select_best_index(r2_scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, r2) in r2_scores.iter().enumerate().skip(1) {
        let current = r2_scores[best];
        let improved = if current.is_nan() { !r2.is_nan() } else { *r2 > current };
        if improved {
            best = i;
        }
    }
    best
}

/// Train both candidates and select the better one by held-out R².
pub fn train_and_select(frame: &Frame, y: &[f64]) -> Result<TrainingOutcome, CarbonError> {
    if frame.n_rows == 0 {
        return Err(CarbonError::EmptyDataset);
    }

    let (train_index, test_index) = train_test_split(frame.n_rows, TEST_SIZE, SEED);
    let x_train = frame.take(&train_index);
    let x_test = frame.take(&test_index);
    let y_train: Vec<f64> = train_index.iter().map(|&i| y[i]).collect();
    let y_test: Vec<f64> = test_index.iter().map(|&i| y[i]).collect();
    info!("split {} rows into {} train / {} test", frame.n_rows, x_train.n_rows, x_test.n_rows);

    let candidates = vec![
        Estimator::RandomForest(RandomForestRegressor::new(N_ESTIMATORS, SEED)),
        Estimator::GradientBoosting(GradientBoostingRegressor::new(N_ESTIMATORS, SEED)),
    ];

    let mut fitted = Vec::with_capacity(candidates.len());
    let mut reports = Vec::with_capacity(candidates.len());
    for estimator in candidates {
        let name = estimator.name();
        info!("fitting {}", name);
        let pipeline = Pipeline::fit(&x_train, &y_train, estimator)?;
        let preds = pipeline.predict(&x_test)?;
        let report = RegressionReport::evaluate(&y_test, &preds);

        println!("{} Results:", name);
        println!("MAE: {:.2}", report.mae);
        println!("RMSE: {:.2}", report.rmse);
        println!("R² Score: {:.2}", report.r2);
        println!("{}", "-".repeat(40));

        fitted.push(pipeline);
        reports.push(CandidateReport { name, report });
    }

    let r2_scores: Vec<f64> = reports.iter().map(|c| c.report.r2).collect();
    let best = select_best_index(&r2_scores);
    let pipeline = fitted.swap_remove(best);

    Ok(TrainingOutcome { pipeline, reports })
}
