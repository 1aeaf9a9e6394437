//! Preprocessing
//!
//! The fitted column transformer that turns a raw survey frame into the dense
//! feature block the estimators train on: numeric columns are standardized,
//! categorical columns are one-hot encoded over the categories seen at fit
//! time, and whatever is still missing after encoding is median-imputed.
//!
//! All learned statistics (means, scales, category tables, medians) are serde
//! serializable and travel inside the persisted pipeline, so scoring applies
//! exactly the transform that training learned.
use crate::data::{Column, Frame};
use crate::errors::CarbonError;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Standardize numeric columns to zero mean and unit variance.
///
/// Missing values are ignored when learning the statistics and pass through
/// the transform as `NaN` for the imputer to fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl StandardScaler {
    /// Learn per-column mean and scale.
    pub fn fit(columns: &[&[f64]]) -> Self {
        let mut means = Vec::with_capacity(columns.len());
        let mut scales = Vec::with_capacity(columns.len());
        for col in columns {
            let observed: Vec<f64> = col.iter().copied().filter(|v| !v.is_nan()).collect();
            let n = observed.len() as f64;
            let mean = if observed.is_empty() {
                0.0
            } else {
                observed.iter().sum::<f64>() / n
            };
            let variance = if observed.is_empty() {
                0.0
            } else {
                observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
            };
            let scale = variance.sqrt();
            // A constant column scales by 1 so it maps to all zeros.
            let scale = if scale == 0.0 || !scale.is_finite() { 1.0 } else { scale };
            means.push(mean);
            scales.push(scale);
        }
        StandardScaler { means, scales }
    }

    /// Standardize one value of column `j`.
    pub fn transform_value(&self, j: usize, value: f64) -> f64 {
        (value - self.means[j]) / self.scales[j]
    }
}

/// One-hot encode categorical columns.
///
/// Categories are learned per column at fit time and held in sorted order. A
/// value unseen during fitting, or missing outright, encodes as all zeros for
/// that column's block rather than erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Sorted category values per column. Drives feature-name expansion.
    pub categories: Vec<Vec<String>>,
    /// Category value to offset within each column's block.
    lookup: Vec<HashMap<String, usize>>,
}

impl OneHotEncoder {
    /// Learn the category table of each column.
    pub fn fit(columns: &[&[Option<String>]]) -> Self {
        let mut categories = Vec::with_capacity(columns.len());
        let mut lookup = Vec::with_capacity(columns.len());
        for col in columns {
            let mut seen: Vec<String> = Vec::new();
            for value in col.iter().flatten() {
                if !seen.contains(value) {
                    seen.push(value.clone());
                }
            }
            seen.sort();
            let map: HashMap<String, usize> = seen.iter().cloned().zip(0..).collect();
            categories.push(seen);
            lookup.push(map);
        }
        OneHotEncoder { categories, lookup }
    }

    /// Width of column `j`'s one-hot block.
    pub fn width(&self, j: usize) -> usize {
        self.categories[j].len()
    }

    /// Offset of `value` within column `j`'s block, if it was seen at fit time.
    pub fn offset(&self, j: usize, value: &str) -> Option<usize> {
        self.lookup[j].get(value).copied()
    }
}

/// Replace missing values with the per-column median of the fit split.
///
/// Fit on the encoded feature block, after scaling and encoding, so the
/// medians live in the same space the estimators see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedianImputer {
    pub medians: Vec<f64>,
}

fn median(values: &[f64]) -> f64 {
    let mut observed: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if observed.is_empty() {
        return 0.0;
    }
    observed.sort_by(|a, b| a.total_cmp(b));
    let mid = observed.len() / 2;
    if observed.len() % 2 == 1 {
        observed[mid]
    } else {
        (observed[mid - 1] + observed[mid]) / 2.0
    }
}

impl MedianImputer {
    /// Learn the median of every column of a column-major encoded block.
    pub fn fit(data: &[f64], rows: usize, cols: usize) -> Self {
        let medians = (0..cols).map(|j| median(&data[j * rows..(j + 1) * rows])).collect();
        MedianImputer { medians }
    }

    /// Fill missing values in place.
    pub fn transform(&self, data: &mut [f64], rows: usize) {
        for (j, m) in self.medians.iter().enumerate() {
            for value in data[j * rows..(j + 1) * rows].iter_mut() {
                if value.is_nan() {
                    *value = *m;
                }
            }
        }
    }
}

/// The fitted column transformer.
///
/// Routes numeric columns through the scaler and categorical columns through
/// the encoder, emitting one contiguous column-major block: the scaled
/// numeric columns first, then each categorical column's one-hot block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
}

impl Preprocessor {
    /// Fit the scaler and encoder on a training frame.
    ///
    /// Columns are routed by their declared role, carried on the frame's
    /// column payloads, in frame order.
    pub fn fit(frame: &Frame) -> Self {
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        let mut numeric: Vec<&[f64]> = Vec::new();
        let mut categorical: Vec<&[Option<String>]> = Vec::new();

        for (name, column) in frame.names.iter().zip(&frame.columns) {
            match column {
                Column::Numeric(values) => {
                    numeric_columns.push(name.clone());
                    numeric.push(values);
                }
                Column::Categorical(values) => {
                    categorical_columns.push(name.clone());
                    categorical.push(values);
                }
            }
        }

        Preprocessor {
            numeric_columns,
            categorical_columns,
            scaler: StandardScaler::fit(&numeric),
            encoder: OneHotEncoder::fit(&categorical),
        }
    }

    /// Total width of the encoded feature block.
    pub fn width(&self) -> usize {
        let one_hot: usize = (0..self.categorical_columns.len()).map(|j| self.encoder.width(j)).sum();
        self.numeric_columns.len() + one_hot
    }

    /// Expanded feature names: numeric columns first, then `column_category`
    /// for every learned one-hot slot.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.numeric_columns.clone();
        for (col, categories) in self.categorical_columns.iter().zip(&self.encoder.categories) {
            for category in categories {
                names.push(format!("{}_{}", col, category));
            }
        }
        names
    }

    /// Encode a frame into a column-major feature block.
    ///
    /// The frame must carry every column the preprocessor was fit on; extra
    /// columns are ignored. Missing numeric values stay `NaN`, and missing or
    /// unseen categorical values leave their one-hot block all zero.
    pub fn transform(&self, frame: &Frame) -> Result<Vec<f64>, CarbonError> {
        let rows = frame.n_rows;
        let mut data = vec![0.0; rows * self.width()];

        for (j, name) in self.numeric_columns.iter().enumerate() {
            let values = match frame.column(name) {
                Some(Column::Numeric(v)) => v,
                _ => return Err(CarbonError::ColumnMismatch),
            };
            let out = &mut data[j * rows..(j + 1) * rows];
            for (slot, value) in out.iter_mut().zip(values) {
                *slot = if value.is_nan() {
                    f64::NAN
                } else {
                    self.scaler.transform_value(j, *value)
                };
            }
        }

        let mut block_start = self.numeric_columns.len();
        for (j, name) in self.categorical_columns.iter().enumerate() {
            let values = match frame.column(name) {
                Some(Column::Categorical(v)) => v,
                _ => return Err(CarbonError::ColumnMismatch),
            };
            for (i, value) in values.iter().enumerate() {
                if let Some(value) = value {
                    if let Some(offset) = self.encoder.offset(j, value) {
                        data[(block_start + offset) * rows + i] = 1.0;
                    }
                }
            }
            block_start += self.encoder.width(j);
        }

        Ok(data)
    }
}
