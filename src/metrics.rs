//! Regression metrics
//!
//! The held-out evaluation metrics reported for each candidate model.
use serde::{Deserialize, Serialize};

/// Mean absolute error.
pub fn mean_absolute_error(y: &[f64], yhat: &[f64]) -> f64 {
    let res = y.iter().zip(yhat).map(|(y_, yhat_)| (y_ - yhat_).abs()).sum::<f64>();
    res / y.len() as f64
}

/// Root mean squared error.
pub fn root_mean_squared_error(y: &[f64], yhat: &[f64]) -> f64 {
    let res = y.iter().zip(yhat).map(|(y_, yhat_)| (y_ - yhat_).powi(2)).sum::<f64>();
    (res / y.len() as f64).sqrt()
}

/// R², the fraction of target variance explained by the model.
///
/// A constant target yields `0.0` for a perfect fit and `-inf` otherwise,
/// mirroring the usual library convention of not crediting variance that was
/// never there.
pub fn r2_score(y: &[f64], yhat: &[f64]) -> f64 {
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let ss_res = y.iter().zip(yhat).map(|(y_, yhat_)| (y_ - yhat_).powi(2)).sum::<f64>();
    let ss_tot = y.iter().map(|y_| (y_ - mean).powi(2)).sum::<f64>();
    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            return 0.0;
        }
        return f64::NEG_INFINITY;
    }
    1.0 - ss_res / ss_tot
}

/// The metric bundle computed for one candidate on the held-out split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl RegressionReport {
    /// Evaluate all three metrics at once.
    pub fn evaluate(y: &[f64], yhat: &[f64]) -> Self {
        RegressionReport {
            mae: mean_absolute_error(y, yhat),
            rmse: root_mean_squared_error(y, yhat),
            r2: r2_score(y, yhat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mae() {
        let y = vec![1.0, 2.0, 3.0];
        let yhat = vec![1.0, 3.0, 1.0];
        assert!((mean_absolute_error(&y, &yhat) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rmse() {
        let y = vec![0.0, 0.0];
        let yhat = vec![3.0, 4.0];
        let expected = (25.0f64 / 2.0).sqrt();
        assert!((root_mean_squared_error(&y, &yhat) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_r2_perfect_fit() {
        let y = vec![1.0, 2.0, 3.0, 4.0];
        assert!((r2_score(&y, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_mean_prediction_is_zero() {
        let y = vec![1.0, 2.0, 3.0];
        let yhat = vec![2.0, 2.0, 2.0];
        assert!(r2_score(&y, &yhat).abs() < 1e-12);
    }

    #[test]
    fn test_report_bundle() {
        let y = vec![1.0, 2.0, 3.0];
        let report = RegressionReport::evaluate(&y, &y);
        assert_eq!(report.mae, 0.0);
        assert_eq!(report.rmse, 0.0);
        assert_eq!(report.r2, 1.0);
    }
}
