//! Loader for labelled strip measurements.
//!
//! Reads a CSV file with `Label`, `X` and `Y` columns and groups the points by
//! label. Header names are matched case-insensitively and a single trailing
//! comma inside a header cell is tolerated (`X,` is the same column as `x`).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading measurements.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required columns: {0}")]
    MissingColumns(String),

    /// A coordinate could not be read as a finite real number.
    #[error("Row {row}: cannot parse coordinates ({x}, {y})")]
    MalformedInput { row: usize, x: String, y: String },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// A single measured position on a strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Points grouped by label, each group in file order.
pub type LabelGroups = HashMap<String, Vec<Point>>;

/// Header positions for each logical column. A name may appear more than once;
/// the first cell with a non-empty value wins.
#[derive(Debug, Default)]
struct ColumnMap {
    label: Vec<usize>,
    x: Vec<usize>,
    y: Vec<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut map = ColumnMap::default();
        for (i, name) in headers.iter().enumerate() {
            match normalize_header(name).as_str() {
                "label" => map.label.push(i),
                "x" => map.x.push(i),
                "y" => map.y.push(i),
                _ => {}
            }
        }

        let missing: Vec<&str> = [
            ("Label", map.label.is_empty()),
            ("X", map.x.is_empty()),
            ("Y", map.y.is_empty()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(LoaderError::MissingColumns(missing.join(", ")));
        }
        Ok(map)
    }
}

fn normalize_header(name: &str) -> String {
    let trimmed = name.trim();
    trimmed
        .strip_suffix(',')
        .unwrap_or(trimmed)
        .trim()
        .to_lowercase()
}

fn first_non_empty<'r>(record: &'r StringRecord, columns: &[usize]) -> &'r str {
    columns
        .iter()
        .filter_map(|&i| record.get(i))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

fn parse_coord(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Load labelled points from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, lacks one of the `Label`, `X`,
/// `Y` columns, or contains a coordinate that is not a finite number. Rows
/// with an empty label are skipped.
pub fn load_label_groups<P: AsRef<Path>>(path: P) -> Result<LabelGroups> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let groups = read_label_groups(BufReader::new(file))?;

    let total: usize = groups.values().map(Vec::len).sum();
    info!(
        "Loaded {} points across {} labels from {}",
        total,
        groups.len(),
        path.display()
    );
    Ok(groups)
}

/// Read labelled points from any CSV source.
pub fn read_label_groups<R: Read>(source: R) -> Result<LabelGroups> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut groups = LabelGroups::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = idx + 1;

        let label = first_non_empty(&record, &columns.label).trim();
        if label.is_empty() {
            debug!("Row {}: empty label, skipped", row);
            continue;
        }

        let x_raw = first_non_empty(&record, &columns.x).trim();
        let y_raw = first_non_empty(&record, &columns.y).trim();

        let point = match (parse_coord(x_raw), parse_coord(y_raw)) {
            (Some(x), Some(y)) => Point::new(x, y),
            _ => {
                return Err(LoaderError::MalformedInput {
                    row,
                    x: x_raw.to_string(),
                    y: y_raw.to_string(),
                })
            }
        };

        groups.entry(label.to_string()).or_default().push(point);
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_label_groups() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Label,X,Y").unwrap();
        writeln!(file, "A,0.0,0.0").unwrap();
        writeln!(file, "B,10.5,1.0").unwrap();
        writeln!(file, "A,50.2,0.1").unwrap();
        writeln!(file, "A,100.0,0.0").unwrap();
        file.flush().unwrap();

        let groups = load_label_groups(file.path())?;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["A"].len(), 3);
        assert_eq!(groups["A"][1], Point::new(50.2, 0.1));
        assert_eq!(groups["B"], vec![Point::new(10.5, 1.0)]);

        Ok(())
    }

    #[test]
    fn test_header_variants() -> Result<()> {
        let data = "LABEL,\"x,\",\" Y, \"\n strip1 , 1.5 ,2.5\n";
        let groups = read_label_groups(data.as_bytes())?;
        assert_eq!(groups["strip1"], vec![Point::new(1.5, 2.5)]);

        let data = "label,x,y,extra\nC,3,4,ignored\n";
        let groups = read_label_groups(data.as_bytes())?;
        assert_eq!(groups["C"], vec![Point::new(3.0, 4.0)]);

        Ok(())
    }

    #[test]
    fn test_duplicate_headers_use_first_non_empty() -> Result<()> {
        let data = "Label,X,x,Y\nA,,5,1\nA,2,9,1\n";
        let groups = read_label_groups(data.as_bytes())?;
        assert_eq!(groups["A"], vec![Point::new(5.0, 1.0), Point::new(2.0, 1.0)]);
        Ok(())
    }

    #[test]
    fn test_empty_label_rows_skipped() -> Result<()> {
        let data = "Label,X,Y\n,1,1\n   ,2,2\nA,3,3\n,not-a-number,\n";
        let groups = read_label_groups(data.as_bytes())?;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["A"], vec![Point::new(3.0, 3.0)]);
        Ok(())
    }

    #[test]
    fn test_malformed_coordinate_reports_row() {
        let data = "Label,X,Y\nA,1,1\nA,2,2\nA, 3.x ,3\n";
        let err = read_label_groups(data.as_bytes()).unwrap_err();
        match err {
            LoaderError::MalformedInput { row, x, y } => {
                assert_eq!(row, 3);
                assert_eq!(x, "3.x");
                assert_eq!(y, "3");
            }
            other => panic!("Expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_coordinate_is_malformed() {
        let data = "Label,X,Y\nA,1,\n";
        let err = read_label_groups(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoaderError::MalformedInput { row: 1, .. }));
        assert_eq!(err.to_string(), "Row 1: cannot parse coordinates (1, )");
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let data = "Label,X,Y\nA,NaN,0\n";
        let err = read_label_groups(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoaderError::MalformedInput { .. }));
    }

    #[test]
    fn test_missing_columns() {
        let data = "Name,X\nA,1\n";
        let err = read_label_groups(data.as_bytes()).unwrap_err();
        match err {
            LoaderError::MissingColumns(cols) => assert_eq!(cols, "Label, Y"),
            other => panic!("Expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_label_groups("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoaderError::Io(_)));
    }
}
