//! Loading series tables from files.
//!
//! The loader sniffs the format from the file extension (CSV, TSV, JSON or an Excel
//! workbook), finds the time axis as the first column whose every cell parses as a
//! timestamp, checks chronological order, and coerces every other column to numbers. Cells that do not parse become missing
//! (`NaN`) instead of failing the load.

pub mod delimited;
pub mod excel;
pub mod json;

use crate::data::{parse_timestamp, SeriesTable};
use crate::error::TableError;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Ingestion failures.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected JSON layout: {0}")]
    JsonLayout(String),

    #[error("failed to read workbook: {0}")]
    Excel(#[from] calamine::Error),

    #[error("unexpected workbook layout: {0}")]
    ExcelLayout(String),

    #[error("file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("no valid datetime column found")]
    NoTimeColumn,

    #[error(transparent)]
    Table(#[from] TableError),
}

/// One cell as read from a source file, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Text(String),
    Number(f64),
    Missing,
}

impl RawCell {
    fn as_number(&self) -> f64 {
        match self {
            RawCell::Number(value) => *value,
            RawCell::Text(text) => text.trim().parse().unwrap_or(f64::NAN),
            RawCell::Missing => f64::NAN,
        }
    }
}

/// Source file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    Json,
    Excel,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "tsv" => Ok(SourceFormat::Tsv),
            "json" => Ok(SourceFormat::Json),
            "xlsx" | "xlsm" | "xls" => Ok(SourceFormat::Excel),
            _ => Err(IngestError::UnsupportedFormat(format!(".{}", extension))),
        }
    }
}

/// Load a series table from `path`, picking the parser by extension.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<SeriesTable, IngestError> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)?;
    let contents = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let table = parse_table(&contents, format)?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        streams = table.streams().len(),
        time_column = table.time_column(),
        "time series data is valid"
    );
    Ok(table)
}

/// Parse already-loaded file contents. Text formats must be UTF-8.
pub fn parse_table(contents: &[u8], format: SourceFormat) -> Result<SeriesTable, IngestError> {
    let columns = match format {
        SourceFormat::Csv => delimited::read_columns(std::str::from_utf8(contents)?, b',')?,
        SourceFormat::Tsv => delimited::read_columns(std::str::from_utf8(contents)?, b'\t')?,
        SourceFormat::Json => json::read_columns(std::str::from_utf8(contents)?)?,
        SourceFormat::Excel => excel::read_columns(contents)?,
    };
    build_table(columns)
}

/// Turn raw named columns into a validated table.
pub fn build_table(columns: Vec<(String, Vec<RawCell>)>) -> Result<SeriesTable, IngestError> {
    let time_idx = columns
        .iter()
        .position(|(_, cells)| is_time_column(cells))
        .ok_or(IngestError::NoTimeColumn)?;

    let mut columns = columns;
    let (time_name, time_cells) = columns.remove(time_idx);
    debug!(time_column = %time_name, "detected time column");

    let timestamps = time_cells
        .iter()
        .map(|cell| match cell {
            RawCell::Text(text) => parse_timestamp(text),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or(IngestError::NoTimeColumn)?;

    let values = columns
        .into_iter()
        .map(|(name, cells)| (name, cells.iter().map(RawCell::as_number).collect()))
        .collect();

    Ok(SeriesTable::new(time_name, timestamps, values)?)
}

fn is_time_column(cells: &[RawCell]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| match cell {
            RawCell::Text(text) => parse_timestamp(text).is_some(),
            _ => false,
        })
}
