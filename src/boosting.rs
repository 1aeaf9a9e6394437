//! Gradient boosting
//!
//! Squared-loss gradient boosting over shallow regression trees. The model
//! starts from the target mean and each round fits a depth-limited tree to
//! the current residuals, shrunk by the learning rate.
use crate::data::Matrix;
use crate::tree::{Tree, TreeParams};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const DEFAULT_LEARNING_RATE: f64 = 0.1;
const DEFAULT_MAX_DEPTH: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub seed: u64,
    /// The initial prediction value of the model, the target mean at fit time.
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl GradientBoostingRegressor {
    pub fn new(n_estimators: usize, seed: u64) -> Self {
        GradientBoostingRegressor {
            n_estimators,
            learning_rate: DEFAULT_LEARNING_RATE,
            max_depth: DEFAULT_MAX_DEPTH,
            seed,
            base_score: 0.0,
            trees: Vec::new(),
        }
    }

    /// Fit the booster on an encoded feature block.
    pub fn fit(&mut self, data: &Matrix, y: &[f64]) {
        let n = data.rows;
        self.base_score = y.iter().sum::<f64>() / n as f64;
        self.trees = Vec::with_capacity(self.n_estimators);

        let params = TreeParams {
            max_depth: Some(self.max_depth),
            ..TreeParams::default()
        };
        let mut yhat = vec![self.base_score; n];
        let index: Vec<usize> = (0..n).collect();

        for _ in 0..self.n_estimators {
            let residuals: Vec<f64> = y.iter().zip(&yhat).map(|(y_, yhat_)| y_ - yhat_).collect();
            let tree = Tree::fit(data, &residuals, index.clone(), &params);
            for (i, pred) in yhat.iter_mut().enumerate() {
                *pred += self.learning_rate * tree.predict_index(data, i);
            }
            self.trees.push(tree);
        }
    }

    /// Predict every row of an encoded feature block.
    pub fn predict(&self, data: &Matrix) -> Vec<f64> {
        (0..data.rows)
            .into_par_iter()
            .map(|i| {
                let boost: f64 = self.trees.iter().map(|t| t.predict_index(data, i)).sum();
                self.base_score + self.learning_rate * boost
            })
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
