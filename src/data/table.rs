use crate::error::TableError;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Multivariate time series: one time axis, one numeric column per stream.
///
/// Missing observations are stored as `f64::NAN`. The time axis is validated to be
/// non-decreasing at construction; the table is immutable afterwards and is only ever
/// borrowed by the analysis core.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    time_column: String,
    timestamps: Vec<NaiveDateTime>,
    streams: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl SeriesTable {
    /// Build a table from a time axis and named value columns.
    pub fn new(
        time_column: impl Into<String>,
        timestamps: Vec<NaiveDateTime>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, TableError> {
        let time_column = time_column.into();
        let rows = timestamps.len();

        if let Some(row) = timestamps.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(TableError::OutOfOrder {
                column: time_column,
                row: row + 1,
            });
        }

        let mut seen = HashSet::with_capacity(columns.len());
        let mut streams = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());

        for (name, column) in columns {
            if column.len() != rows {
                return Err(TableError::LengthMismatch {
                    column: name,
                    expected: rows,
                    got: column.len(),
                });
            }
            if name == time_column || !seen.insert(name.clone()) {
                return Err(TableError::DuplicateColumn(name));
            }
            streams.push(name);
            values.push(column);
        }

        Ok(Self {
            time_column,
            timestamps,
            streams,
            columns: values,
        })
    }

    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Stream identifiers in column order.
    pub fn streams(&self) -> &[String] {
        &self.streams
    }

    pub fn row_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn has_stream(&self, name: &str) -> bool {
        self.streams.iter().any(|s| s == name)
    }

    /// Full column for a stream.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.entry(name).map(|(_, column)| column)
    }

    /// Stored identifier and column for a stream, both borrowed from the table.
    pub fn entry(&self, name: &str) -> Option<(&str, &[f64])> {
        self.streams
            .iter()
            .position(|s| s == name)
            .map(|idx| (self.streams[idx].as_str(), self.columns[idx].as_slice()))
    }
}
