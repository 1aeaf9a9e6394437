use crate::errors::CarbonError;
use crate::schema::{ColumnRole, COLUMNS, TARGET_COLUMN};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Contiguous column major matrix view over a slice of floats.
///
/// The encoded feature block handed to the estimators is kept in a single
/// contiguous buffer in column-major order, which makes per-feature scans
/// (the hot path when searching for splits) simple slice walks.
pub struct Matrix<'a> {
    /// The raw data stored in a single slice.
    pub data: &'a [f64],
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a> Matrix<'a> {
    /// Create a new Matrix over column-major `data`.
    pub fn new(data: &'a [f64], rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols);
        Matrix { data, rows, cols }
    }

    /// Get a single value from the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - The jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[j * self.rows + i]
    }

    /// Get an entire column of the matrix.
    pub fn get_col(&self, col: usize) -> &[f64] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    /// Get a row of the data as a vector.
    pub fn get_row(&self, row: usize) -> Vec<f64> {
        (0..self.cols).map(|j| self.get(row, j)).collect()
    }
}

/// A single survey column, typed by its declared role.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric values, with `NaN` marking missing entries.
    Numeric(Vec<f64>),
    /// Categorical values, with `None` marking missing entries.
    Categorical(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Select the rows at `index`, in order.
    fn take(&self, index: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(index.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => Column::Categorical(index.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// An owned table of survey feature columns.
///
/// Column order follows the schema declaration, not the order columns happen
/// to appear in the source file, so every frame built from the same schema
/// lines up positionally.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Column headers, parallel to `columns`.
    pub names: Vec<String>,
    /// Column payloads, parallel to `names`.
    pub columns: Vec<Column>,
    /// Number of rows in every column.
    pub n_rows: usize,
}

impl Frame {
    /// Assemble a frame from parallel name and column vectors.
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);
        for col in &columns {
            assert_eq!(col.len(), n_rows);
        }
        Frame { names, columns, n_rows }
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Find a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names.iter().position(|n| n == name).map(|i| &self.columns[i])
    }

    /// Select the rows at `index`, in order, across all columns.
    pub fn take(&self, index: &[usize]) -> Frame {
        Frame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(index)).collect(),
            n_rows: index.len(),
        }
    }
}

/// Load the training CSV, returning the feature frame and the target vector.
///
/// Every schema column and the target must be present in the header. Numeric
/// cells that are empty or unparseable are loaded as missing and left for the
/// imputer; a bad target cell fails the row outright, since there is nothing
/// sensible to train against.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<(Frame, Vec<f64>), CarbonError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CarbonError::UnableToRead(format!("{}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| CarbonError::UnableToRead(format!("{}: {}", path.display(), e)))?
        .clone();

    let mut missing = Vec::new();
    let mut column_indices = Vec::with_capacity(COLUMNS.len());
    for c in &COLUMNS {
        match headers.iter().position(|h| h == c.name) {
            Some(i) => column_indices.push(i),
            None => missing.push(c.name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(CarbonError::MissingColumns(missing));
    }
    let target_index = headers
        .iter()
        .position(|h| h == TARGET_COLUMN)
        .ok_or_else(|| CarbonError::MissingTarget(TARGET_COLUMN.to_string()))?;

    let mut columns: Vec<Column> = COLUMNS
        .iter()
        .map(|c| match c.role {
            ColumnRole::Numeric => Column::Numeric(Vec::new()),
            ColumnRole::Categorical => Column::Categorical(Vec::new()),
        })
        .collect();
    let mut y = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| CarbonError::InvalidRow(row, e.to_string()))?;

        let target_str = record.get(target_index).unwrap_or("");
        let target_val: f64 = target_str
            .trim()
            .parse()
            .map_err(|_| CarbonError::InvalidRow(row, format!("bad target value '{}'", target_str)))?;
        y.push(target_val);

        for (col, &idx) in columns.iter_mut().zip(&column_indices) {
            let cell = record.get(idx).unwrap_or("").trim();
            match col {
                Column::Numeric(values) => {
                    let val = if cell.is_empty() {
                        f64::NAN
                    } else {
                        cell.parse::<f64>().unwrap_or(f64::NAN)
                    };
                    values.push(val);
                }
                Column::Categorical(values) => {
                    if cell.is_empty() {
                        values.push(None);
                    } else {
                        values.push(Some(cell.to_string()));
                    }
                }
            }
        }
    }

    if y.is_empty() {
        return Err(CarbonError::EmptyDataset);
    }

    let names = COLUMNS.iter().map(|c| c.name.to_string()).collect();
    Ok((Frame::new(names, columns), y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn survey_header() -> String {
        let mut cols: Vec<&str> = COLUMNS.iter().map(|c| c.name).collect();
        cols.push(TARGET_COLUMN);
        cols.join(",")
    }

    fn survey_row(diet: &str, distance: &str, target: &str) -> String {
        // Categorical cells keyed off the diet value, numeric cells fixed.
        let cells: Vec<String> = COLUMNS
            .iter()
            .map(|c| match (c.name, c.role) {
                ("Diet", _) => diet.to_string(),
                ("Vehicle Monthly Distance Km", _) => distance.to_string(),
                (_, ColumnRole::Numeric) => "3".to_string(),
                (_, ColumnRole::Categorical) => "a".to_string(),
            })
            .collect();
        format!("{},{}", cells.join(","), target)
    }

    #[test]
    fn test_matrix_get() {
        let v = vec![1., 2., 3., 5., 6., 7.];
        let m = Matrix::new(&v, 3, 2);
        assert_eq!(m.get(0, 0), 1.);
        assert_eq!(m.get(1, 0), 2.);
        assert_eq!(m.get(0, 1), 5.);
        assert_eq!(m.get_col(1), &[5., 6., 7.]);
        assert_eq!(m.get_row(2), vec![3., 7.]);
    }

    #[test]
    fn test_load_dataset() {
        let csv = format!(
            "{}\n{}\n{}\n",
            survey_header(),
            survey_row("omnivore", "210", "1500.5"),
            survey_row("vegetarian", "", "900.25"),
        );
        let path = write_temp_csv("carboncast_load_test.csv", &csv);
        let (frame, y) = load_dataset(&path).unwrap();

        assert_eq!(frame.n_rows, 2);
        assert_eq!(frame.n_cols(), 19);
        assert_eq!(y, vec![1500.5, 900.25]);

        match frame.column("Vehicle Monthly Distance Km").unwrap() {
            Column::Numeric(v) => {
                assert_eq!(v[0], 210.0);
                assert!(v[1].is_nan());
            }
            _ => panic!("expected numeric column"),
        }
        match frame.column("Diet").unwrap() {
            Column::Categorical(v) => {
                assert_eq!(v[0].as_deref(), Some("omnivore"));
                assert_eq!(v[1].as_deref(), Some("vegetarian"));
            }
            _ => panic!("expected categorical column"),
        }
    }

    #[test]
    fn test_load_dataset_missing_columns() {
        let path = write_temp_csv(
            "carboncast_missing_cols.csv",
            "Diet,CarbonEmission\nomnivore,100\n",
        );
        match load_dataset(&path) {
            Err(CarbonError::MissingColumns(cols)) => {
                assert!(cols.contains(&"Body Type".to_string()));
                assert!(!cols.contains(&"Diet".to_string()));
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_dataset_bad_target() {
        let csv = format!(
            "{}\n{}\n",
            survey_header(),
            survey_row("omnivore", "210", "not-a-number"),
        );
        let path = write_temp_csv("carboncast_bad_target.csv", &csv);
        assert!(matches!(load_dataset(&path), Err(CarbonError::InvalidRow(0, _))));
    }

    #[test]
    fn test_frame_take() {
        let frame = Frame::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                Column::Numeric(vec![1., 2., 3.]),
                Column::Categorical(vec![Some("x".into()), None, Some("z".into())]),
            ],
        );
        let sub = frame.take(&[2, 0]);
        assert_eq!(sub.n_rows, 2);
        assert_eq!(sub.columns[0], Column::Numeric(vec![3., 1.]));
        assert_eq!(
            sub.columns[1],
            Column::Categorical(vec![Some("z".into()), Some("x".into())])
        );
    }
}
