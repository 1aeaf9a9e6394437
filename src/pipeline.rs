//! Pipeline
//!
//! The unit of persistence: the fitted preprocessor, the median imputer, and
//! the winning estimator, saved and loaded as one JSON object. The pipeline
//! also records the raw input column names it was fit on, which is what the
//! prediction program validates incoming records against.
use crate::boosting::GradientBoostingRegressor;
use crate::data::{Frame, Matrix};
use crate::errors::CarbonError;
use crate::forest::RandomForestRegressor;
use crate::preprocess::{MedianImputer, Preprocessor};
use serde::{Deserialize, Serialize};
use std::fs;

/// The two candidate regression estimators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Estimator {
    RandomForest(RandomForestRegressor),
    GradientBoosting(GradientBoostingRegressor),
}

impl Estimator {
    /// Human-readable model name, as reported in training output.
    pub fn name(&self) -> &'static str {
        match self {
            Estimator::RandomForest(_) => "Random Forest",
            Estimator::GradientBoosting(_) => "Gradient Boosting",
        }
    }

    fn fit(&mut self, data: &Matrix, y: &[f64]) {
        match self {
            Estimator::RandomForest(model) => model.fit(data, y),
            Estimator::GradientBoosting(model) => model.fit(data, y),
        }
    }

    fn predict(&self, data: &Matrix) -> Vec<f64> {
        match self {
            Estimator::RandomForest(model) => model.predict(data),
            Estimator::GradientBoosting(model) => model.predict(data),
        }
    }

    /// Per-feature importance scores over the encoded feature block.
    ///
    /// `None` for estimator kinds that carry no importances; both tree
    /// ensembles here do.
    pub fn feature_importances(&self, n_features: usize) -> Option<Vec<f64>> {
        match self {
            Estimator::RandomForest(model) => Some(model.feature_importances(n_features)),
            Estimator::GradientBoosting(model) => Some(model.feature_importances(n_features)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub preprocessor: Preprocessor,
    pub imputer: MedianImputer,
    pub estimator: Estimator,
    /// Raw survey column names the pipeline was fit on, in training order.
    pub input_columns: Vec<String>,
}

impl Pipeline {
    /// Fit the full pipeline on a training frame.
    pub fn fit(frame: &Frame, y: &[f64], mut estimator: Estimator) -> Result<Pipeline, CarbonError> {
        if frame.n_rows == 0 {
            return Err(CarbonError::EmptyDataset);
        }

        let preprocessor = Preprocessor::fit(frame);
        let mut data = preprocessor.transform(frame)?;
        let rows = frame.n_rows;
        let cols = preprocessor.width();

        let imputer = MedianImputer::fit(&data, rows, cols);
        imputer.transform(&mut data, rows);

        estimator.fit(&Matrix::new(&data, rows, cols), y);

        Ok(Pipeline {
            preprocessor,
            imputer,
            estimator,
            input_columns: frame.names.clone(),
        })
    }

    /// Predict for every row of a raw survey frame.
    pub fn predict(&self, frame: &Frame) -> Result<Vec<f64>, CarbonError> {
        let mut data = self.preprocessor.transform(frame)?;
        let rows = frame.n_rows;
        self.imputer.transform(&mut data, rows);
        Ok(self.estimator.predict(&Matrix::new(&data, rows, self.preprocessor.width())))
    }

    /// Expanded feature names of the encoded block, for importance labeling.
    pub fn feature_names(&self) -> Vec<String> {
        self.preprocessor.feature_names()
    }

    /// Dump the pipeline as a json object.
    pub fn json_dump(&self) -> Result<String, CarbonError> {
        serde_json::to_string(self).map_err(|e| CarbonError::UnableToWrite(e.to_string()))
    }

    /// Parse a pipeline from a json object.
    pub fn from_json(json_str: &str) -> Result<Self, CarbonError> {
        serde_json::from_str::<Pipeline>(json_str).map_err(|e| CarbonError::UnableToRead(e.to_string()))
    }

    /// Save the pipeline as a json object to a file.
    ///
    /// * `path` - Path to save the pipeline.
    pub fn save(&self, path: &str) -> Result<(), CarbonError> {
        let model = self.json_dump()?;
        fs::write(path, model).map_err(|e| CarbonError::UnableToWrite(format!("{}: {}", path, e)))
    }

    /// Load a pipeline from a path to a json pipeline object.
    ///
    /// * `path` - Path to load the pipeline from.
    pub fn load(path: &str) -> Result<Self, CarbonError> {
        let json_str =
            fs::read_to_string(path).map_err(|e| CarbonError::UnableToRead(format!("{}: {}", path, e)))?;
        Self::from_json(&json_str)
    }
}
