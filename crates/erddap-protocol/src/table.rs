//! Griddap JSON table responses.
//!
//! The `.json` output wraps a column-oriented table: `columnNames` plus
//! `rows` of heterogeneous cells (timestamps as strings, values as numbers
//! or null). Only the first row matters for a single-cell query.

use serde::Deserialize;
use serde_json::Value;

/// Column griddap uses for observation timestamps.
pub const TIME_COLUMN: &str = "time";

/// Top-level griddap `.json` body.
#[derive(Debug, Clone, Deserialize)]
pub struct GriddapResponse {
    pub table: GriddapTable,
}

/// The tabular payload inside a griddap response.
#[derive(Debug, Clone, Deserialize)]
pub struct GriddapTable {
    #[serde(rename = "columnNames")]
    pub column_names: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

/// One scalar sample pulled out of a griddap table.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSample {
    /// The variable's value. `None` means the grid holds no data at the
    /// requested cell, which is a valid observation in its own right.
    pub value: Option<f64>,
    /// Timestamp reported by upstream, or the requested time when the
    /// response carries no time column.
    pub observed_time: String,
}

impl GriddapTable {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Extract the sample for `variable` from the first row.
    ///
    /// An empty table, a missing variable column, or a null cell all mean
    /// "no data at this cell" rather than an error.
    pub fn extract_point(&self, variable: &str, requested_time: &str) -> PointSample {
        let row = self.rows.first();

        let value = match (row, self.column_index(variable)) {
            (Some(row), Some(idx)) => row.get(idx).and_then(Value::as_f64),
            _ => None,
        };

        let observed_time = match (row, self.column_index(TIME_COLUMN)) {
            (Some(row), Some(idx)) => row
                .get(idx)
                .and_then(Value::as_str)
                .unwrap_or(requested_time)
                .to_string(),
            _ => requested_time.to_string(),
        };

        PointSample {
            value,
            observed_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUESTED: &str = "2024-01-10T00:00:00Z";

    fn parse(body: &str) -> GriddapTable {
        serde_json::from_str::<GriddapResponse>(body).unwrap().table
    }

    #[test]
    fn extracts_value_and_observed_time() {
        let table = parse(
            r#"{
                "table": {
                    "columnNames": ["time", "latitude", "longitude", "analysed_sst"],
                    "columnTypes": ["String", "float", "float", "double"],
                    "rows": [["2024-01-10T12:00:00Z", 45.025, 0.025, 14.2]]
                }
            }"#,
        );

        let sample = table.extract_point("analysed_sst", REQUESTED);
        assert_eq!(sample.value, Some(14.2));
        assert_eq!(sample.observed_time, "2024-01-10T12:00:00Z");
    }

    #[test]
    fn empty_rows_is_an_absent_sample() {
        let table = parse(
            r#"{"table": {"columnNames": ["time", "analysed_sst"], "rows": []}}"#,
        );

        let sample = table.extract_point("analysed_sst", REQUESTED);
        assert_eq!(sample.value, None);
        assert_eq!(sample.observed_time, REQUESTED);
    }

    #[test]
    fn missing_rows_field_is_an_absent_sample() {
        let table = parse(r#"{"table": {"columnNames": ["time", "analysed_sst"]}}"#);
        assert_eq!(table.extract_point("analysed_sst", REQUESTED).value, None);
    }

    #[test]
    fn unknown_variable_column_is_an_absent_sample() {
        let table = parse(
            r#"{
                "table": {
                    "columnNames": ["time", "latitude", "longitude", "sst"],
                    "rows": [["2024-01-10T12:00:00Z", 45.0, 0.0, 14.2]]
                }
            }"#,
        );

        let sample = table.extract_point("analysed_sst", REQUESTED);
        assert_eq!(sample.value, None);
        // The row still carries a usable timestamp
        assert_eq!(sample.observed_time, "2024-01-10T12:00:00Z");
    }

    #[test]
    fn null_cell_is_an_absent_sample() {
        let table = parse(
            r#"{
                "table": {
                    "columnNames": ["time", "sss"],
                    "rows": [["2024-01-10T12:00:00Z", null]]
                }
            }"#,
        );

        assert_eq!(table.extract_point("sss", REQUESTED).value, None);
    }

    #[test]
    fn integer_cells_read_as_floats() {
        let table = parse(
            r#"{"table": {"columnNames": ["time", "sss"], "rows": [["2024-01-10T12:00:00Z", 35]]}}"#,
        );

        assert_eq!(table.extract_point("sss", REQUESTED).value, Some(35.0));
    }

    #[test]
    fn missing_time_column_falls_back_to_requested_time() {
        let table = parse(r#"{"table": {"columnNames": ["sss"], "rows": [[34.8]]}}"#);

        let sample = table.extract_point("sss", REQUESTED);
        assert_eq!(sample.value, Some(34.8));
        assert_eq!(sample.observed_time, REQUESTED);
    }
}
