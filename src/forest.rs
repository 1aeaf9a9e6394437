//! Random forest
//!
//! Bagged regression trees: each tree is grown to full depth on a bootstrap
//! resample of the training rows, and predictions average over the ensemble.
//! Every tree draws its bootstrap from its own seeded generator, so fitting
//! is deterministic no matter how rayon schedules the work.
use crate::data::Matrix;
use crate::tree::{Tree, TreeParams};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    pub n_estimators: usize,
    pub seed: u64,
    pub trees: Vec<Tree>,
}

impl RandomForestRegressor {
    pub fn new(n_estimators: usize, seed: u64) -> Self {
        RandomForestRegressor {
            n_estimators,
            seed,
            trees: Vec::new(),
        }
    }

    /// Fit the forest on an encoded feature block.
    pub fn fit(&mut self, data: &Matrix, y: &[f64]) {
        let n = data.rows;
        let params = TreeParams::default();
        let seed = self.seed;

        self.trees = (0..self.n_estimators)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(t as u64));
                let index: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                Tree::fit(data, y, index, &params)
            })
            .collect();
    }

    /// Predict every row of an encoded feature block.
    pub fn predict(&self, data: &Matrix) -> Vec<f64> {
        let scale = 1.0 / self.trees.len() as f64;
        (0..data.rows)
            .into_par_iter()
            .map(|i| self.trees.iter().map(|t| t.predict_index(data, i)).sum::<f64>() * scale)
            .collect()
    }

    /// Impurity-based feature importances, normalized to sum to one.
    pub fn feature_importances(&self, n_features: usize) -> Vec<f64> {
        let mut importance = vec![0.0; n_features];
        for tree in &self.trees {
            tree.add_importance(&mut importance);
        }
        let total: f64 = importance.iter().sum();
        if total > 0.0 {
            for v in importance.iter_mut() {
                *v /= total;
            }
        }
        importance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal_data() -> (Vec<f64>, Vec<f64>) {
        // y = 3x over a small grid, column major with a second constant column.
        let x: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v).collect();
        let mut data = x;
        data.extend(std::iter::repeat(1.0).take(40));
        (data, y)
    }

    #[test]
    fn test_forest_fits_signal() {
        let (data, y) = signal_data();
        let m = Matrix::new(&data, 40, 2);
        let mut forest = RandomForestRegressor::new(25, 42);
        forest.fit(&m, &y);

        let preds = forest.predict(&m);
        for (p, actual) in preds.iter().zip(&y) {
            assert!((p - actual).abs() < 10.0, "pred {} far from {}", p, actual);
        }
    }

    #[test]
    fn test_forest_deterministic() {
        let (data, y) = signal_data();
        let m = Matrix::new(&data, 40, 2);

        let mut a = RandomForestRegressor::new(10, 42);
        a.fit(&m, &y);
        let mut b = RandomForestRegressor::new(10, 42);
        b.fit(&m, &y);
        assert_eq!(a.predict(&m), b.predict(&m));

        let mut c = RandomForestRegressor::new(10, 43);
        c.fit(&m, &y);
        assert_ne!(a.predict(&m), c.predict(&m));
    }

    #[test]
    fn test_forest_importances_normalized() {
        let (data, y) = signal_data();
        let m = Matrix::new(&data, 40, 2);
        let mut forest = RandomForestRegressor::new(10, 42);
        forest.fit(&m, &y);

        let importance = forest.feature_importances(2);
        assert!((importance.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        // All the signal is in the first column.
        assert!(importance[0] > 0.99);
    }
}
