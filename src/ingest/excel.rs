use super::{IngestError, RawCell};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// Read the first worksheet of an `.xlsx`/`.xls` workbook into named raw columns.
///
/// The first row is the header. Blank header cells get `Unnamed: <index>` names.
/// Date cells become ISO timestamps so time-column detection treats them like text.
pub fn read_columns(bytes: &[u8]) -> Result<Vec<(String, Vec<RawCell>)>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::ExcelLayout("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| IngestError::ExcelLayout("first worksheet is empty".to_string()))?;

    let mut columns: Vec<(String, Vec<RawCell>)> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell.to_string();
            let name = if name.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name.trim().to_string()
            };
            (name, Vec::new())
        })
        .collect();

    for row in rows {
        for (idx, (_, cells)) in columns.iter_mut().enumerate() {
            cells.push(row.get(idx).map(to_cell).unwrap_or(RawCell::Missing));
        }
    }

    Ok(columns)
}

fn to_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Missing,
        Data::Int(value) => RawCell::Number(*value as f64),
        Data::Float(value) => RawCell::Number(*value),
        Data::Bool(value) => RawCell::Number(if *value { 1.0 } else { 0.0 }),
        Data::String(text) if text.trim().is_empty() => RawCell::Missing,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            RawCell::Text(text.clone())
        }
        Data::DateTime(value) => value
            .as_datetime()
            .map(|t| RawCell::Text(t.format("%Y-%m-%d %H:%M:%S%.f").to_string()))
            .unwrap_or(RawCell::Missing),
    }
}
