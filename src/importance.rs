//! Feature importance
//!
//! Ranks the winning estimator's importance scores under human-readable
//! feature names (numeric columns plus the expanded one-hot names) and
//! renders the top of the ranking as a horizontal bar chart.
use crate::errors::CarbonError;
use crate::pipeline::Pipeline;
use plotters::prelude::*;

/// Fixed output path of the importance chart, in the working directory.
pub const CHART_PATH: &str = "feature_importance.png";
/// Number of features charted.
pub const TOP_N: usize = 15;

/// The full importance ranking, highest score first.
#[derive(Debug, Clone)]
pub struct ImportanceReport {
    pub entries: Vec<(String, f64)>,
}

impl ImportanceReport {
    /// The `n` highest-scoring features.
    pub fn top(&self, n: usize) -> &[(String, f64)] {
        &self.entries[..n.min(self.entries.len())]
    }
}

/// Rank every encoded feature by the winner's importance score.
///
/// Returns `None` when the estimator kind exposes no importances.
pub fn feature_importance(pipeline: &Pipeline) -> Option<ImportanceReport> {
    let names = pipeline.feature_names();
    let scores = pipeline.estimator.feature_importances(names.len())?;
    let mut entries: Vec<(String, f64)> = names.into_iter().zip(scores).collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    Some(ImportanceReport { entries })
}

/// Render the top of the ranking as a horizontal bar chart PNG.
///
/// * `report` - The full ranking.
/// * `model_name` - The winning model's name, shown in the title.
/// * `path` - Output image path.
pub fn render_bar_chart(report: &ImportanceReport, model_name: &str, path: &str) -> Result<(), CarbonError> {
    let entries = report.top(TOP_N);
    if entries.is_empty() {
        return Ok(());
    }

    let chart_err = |e: String| CarbonError::UnableToWrite(format!("{}: {}", path, e));

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(e.to_string()))?;

    let max_score = entries.iter().map(|e| e.1).fold(0.0_f64, f64::max).max(1e-9);
    let n = entries.len() as i32;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Top {} Feature Importances - {}", entries.len(), model_name),
            ("sans-serif", 28),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(280)
        .build_cartesian_2d(0.0..max_score * 1.05, 0..n)
        .map_err(|e| chart_err(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(entries.len())
        .y_label_formatter(&|v: &i32| {
            // Bars draw top-down, so invert the axis position back into a rank.
            let rank = n - 1 - *v;
            if rank >= 0 && (rank as usize) < entries.len() {
                entries[rank as usize].0.clone()
            } else {
                String::new()
            }
        })
        .x_desc("importance")
        .draw()
        .map_err(|e| chart_err(e.to_string()))?;

    chart
        .draw_series(entries.iter().enumerate().map(|(rank, (_, score))| {
            let y0 = n - 1 - rank as i32;
            Rectangle::new([(0.0, y0), (*score, y0 + 1)], BLUE.mix(0.6).filled())
        }))
        .map_err(|e| chart_err(e.to_string()))?;

    root.present().map_err(|e| chart_err(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, Frame};
    use crate::forest::RandomForestRegressor;
    use crate::pipeline::Estimator;

    fn fitted_pipeline() -> Pipeline {
        let n = 40;
        let signal: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let noise: Vec<f64> = (0..n).map(|i| ((i * 31) % 7) as f64).collect();
        let diet: Vec<Option<String>> = (0..n).map(|_| Some("omnivore".to_string())).collect();
        let y: Vec<f64> = signal.iter().map(|v| v * 10.0).collect();
        let frame = Frame::new(
            vec!["signal".to_string(), "noise".to_string(), "diet".to_string()],
            vec![
                Column::Numeric(signal),
                Column::Numeric(noise),
                Column::Categorical(diet),
            ],
        );
        Pipeline::fit(
            &frame,
            &y,
            Estimator::RandomForest(RandomForestRegressor::new(10, 42)),
        )
        .unwrap()
    }

    #[test]
    fn test_ranking_descending() {
        let pipeline = fitted_pipeline();
        let report = feature_importance(&pipeline).unwrap();
        for pair in report.entries.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        // One entry per encoded feature: two numeric + one diet category.
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.entries[0].0, "signal");
    }

    #[test]
    fn test_top_truncates() {
        let pipeline = fitted_pipeline();
        let report = feature_importance(&pipeline).unwrap();
        assert_eq!(report.top(2).len(), 2);
        assert_eq!(report.top(100).len(), report.entries.len());
    }
}
