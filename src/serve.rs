//! Scoring service
//!
//! Turns a single JSON survey record into a prediction against a loaded
//! pipeline: validate the record against the columns the pipeline was fit
//! on, coerce the one numeric field clients are known to send as a string,
//! predict, and assemble the result object. Only the result JSON belongs on
//! stdout; everything else here logs to stderr.
use crate::data::{Column, Frame};
use crate::errors::CarbonError;
use crate::pipeline::Pipeline;
use crate::schema;
use log::{info, warn};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

/// Unit of the emitted prediction.
pub const UNIT: &str = "metric tons CO2 equivalent per year";

/// Read a JSON record from a file.
pub fn load_record<P: AsRef<Path>>(path: P) -> Result<Map<String, Value>, CarbonError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| CarbonError::UnableToRead(format!("{}: {}", path.display(), e)))?;
    let value: Value =
        serde_json::from_str(&text).map_err(|e| CarbonError::UnableToRead(format!("{}: {}", path.display(), e)))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CarbonError::UnableToRead(format!(
            "{}: expected a JSON object",
            path.display()
        ))),
    }
}

/// Score one record, returning the result JSON object.
pub fn score_record(pipeline: &Pipeline, record: &Map<String, Value>) -> Result<Value, CarbonError> {
    let frame = record_to_frame(pipeline, record)?;

    let preds = match pipeline.predict(&frame) {
        Ok(preds) => preds,
        Err(e) => {
            warn!("model expects these features: {}", pipeline.input_columns.join(", "));
            return Err(e);
        }
    };
    let prediction = preds[0];
    info!("prediction successful: {}", prediction);

    Ok(json!({
        "prediction": prediction,
        "unit": UNIT,
        "features": {
            "transportation": echo(record, "Vehicle Monthly Distance Km"),
            "diet": echo(record, "Diet"),
            "recycling": echo(record, "Recycling"),
            "air_travel": echo(record, "Frequency of Traveling by Air"),
        }
    }))
}

fn echo(record: &Map<String, Value>, key: &str) -> Value {
    record.get(key).cloned().unwrap_or_else(|| Value::String("N/A".to_string()))
}

/// Wrap a record as a one-row frame, column order matching the pipeline.
///
/// Every column the pipeline was fit on must be present; the error names the
/// missing ones. Roles come from the pipeline's fitted preprocessor, so
/// training and scoring can never disagree on the expected keys.
pub fn record_to_frame(pipeline: &Pipeline, record: &Map<String, Value>) -> Result<Frame, CarbonError> {
    let missing: Vec<String> = pipeline
        .input_columns
        .iter()
        .filter(|c| !record.contains_key(*c))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(CarbonError::MissingColumns(missing));
    }

    let mut names = Vec::with_capacity(pipeline.input_columns.len());
    let mut columns = Vec::with_capacity(pipeline.input_columns.len());
    for name in &pipeline.input_columns {
        let value = &record[name];
        let column = if pipeline.preprocessor.numeric_columns.contains(name) {
            Column::Numeric(vec![numeric_value(name, value)?])
        } else {
            Column::Categorical(vec![categorical_value(value)])
        };
        names.push(name.clone());
        columns.push(column);
    }
    Ok(Frame::new(names, columns))
}

fn numeric_value(name: &str, value: &Value) -> Result<f64, CarbonError> {
    let coercible = schema::spec_of(name).map(|s| s.coerce_from_string).unwrap_or(false);
    match value {
        Value::Number(n) => Ok(n.as_f64().unwrap_or(f64::NAN)),
        Value::Null => Ok(f64::NAN),
        // Unparseable text becomes missing and is median-imputed downstream.
        Value::String(s) if coercible => Ok(s.trim().parse().unwrap_or(f64::NAN)),
        other => Err(CarbonError::ParseValue(
            other.to_string(),
            name.to_string(),
            "a number".to_string(),
        )),
    }
}

fn categorical_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::RandomForestRegressor;
    use crate::pipeline::Estimator;

    fn fitted_pipeline() -> Pipeline {
        let n = 30;
        let distance: Vec<f64> = (0..n).map(|i| (i * 10) as f64).collect();
        let diet: Vec<Option<String>> = (0..n)
            .map(|i| Some(if i % 2 == 0 { "omnivore" } else { "vegetarian" }.to_string()))
            .collect();
        let y: Vec<f64> = distance.iter().map(|d| d * 2.0).collect();
        let frame = Frame::new(
            vec!["Vehicle Monthly Distance Km".to_string(), "Diet".to_string()],
            vec![Column::Numeric(distance), Column::Categorical(diet)],
        );
        Pipeline::fit(&frame, &y, Estimator::RandomForest(RandomForestRegressor::new(10, 42))).unwrap()
    }

    fn record(distance: Value, diet: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("Vehicle Monthly Distance Km".to_string(), distance);
        map.insert("Diet".to_string(), Value::String(diet.to_string()));
        map
    }

    #[test]
    fn test_score_record_shape() {
        let pipeline = fitted_pipeline();
        let result = score_record(&pipeline, &record(json!(140), "omnivore")).unwrap();

        assert!(result["prediction"].is_f64());
        assert_eq!(result["unit"], UNIT);
        assert_eq!(result["features"]["transportation"], json!(140));
        assert_eq!(result["features"]["diet"], "omnivore");
        // Keys absent from the record echo as N/A.
        assert_eq!(result["features"]["recycling"], "N/A");
        assert_eq!(result["features"]["air_travel"], "N/A");
    }

    #[test]
    fn test_missing_key_is_named() {
        let pipeline = fitted_pipeline();
        let mut map = Map::new();
        map.insert("Diet".to_string(), Value::String("omnivore".to_string()));

        match score_record(&pipeline, &map) {
            Err(CarbonError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["Vehicle Monthly Distance Km".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_numeric_string_coerced() {
        let pipeline = fitted_pipeline();
        let result = score_record(&pipeline, &record(json!("140"), "omnivore")).unwrap();
        assert!(result["prediction"].is_f64());
    }

    #[test]
    fn test_unparseable_numeric_string_imputed() {
        let pipeline = fitted_pipeline();
        // Treated as missing, filled by the imputer, never an error.
        let result = score_record(&pipeline, &record(json!("not-a-number"), "omnivore")).unwrap();
        assert!(result["prediction"].as_f64().unwrap().is_finite());
    }

    #[test]
    fn test_unseen_category_scores() {
        let pipeline = fitted_pipeline();
        let result = score_record(&pipeline, &record(json!(140), "vegan")).unwrap();
        assert!(result["prediction"].as_f64().unwrap().is_finite());
    }

    #[test]
    fn test_non_coercible_column_rejects_strings() {
        // A pipeline fit on a numeric column outside the coercion list.
        let n = 10;
        let bill: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y = bill.clone();
        let frame = Frame::new(
            vec!["Monthly Grocery Bill".to_string()],
            vec![Column::Numeric(bill)],
        );
        let pipeline =
            Pipeline::fit(&frame, &y, Estimator::RandomForest(RandomForestRegressor::new(5, 42))).unwrap();

        let mut map = Map::new();
        map.insert("Monthly Grocery Bill".to_string(), Value::String("5".to_string()));
        assert!(matches!(
            score_record(&pipeline, &map),
            Err(CarbonError::ParseValue(_, _, _))
        ));
    }
}
