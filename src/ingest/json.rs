use super::{IngestError, RawCell};
use serde_json::{Map, Value};

/// Read a JSON document into named raw columns.
///
/// Accepted layouts:
/// - records: `[{"time": "...", "a": 1.0}, ...]`
/// - columns as arrays: `{"time": ["..."], "a": [1.0]}`
/// - columns as row-keyed objects: `{"time": {"0": "..."}, "a": {"0": 1.0}}`
pub fn read_columns(contents: &str) -> Result<Vec<(String, Vec<RawCell>)>, IngestError> {
    let document: Value = serde_json::from_str(contents)?;

    match document {
        Value::Array(records) => from_records(&records),
        Value::Object(columns) => from_columns(&columns),
        _ => Err(IngestError::JsonLayout(
            "expected an array of records or an object of columns".to_string(),
        )),
    }
}

fn from_records(records: &[Value]) -> Result<Vec<(String, Vec<RawCell>)>, IngestError> {
    let mut columns: Vec<(String, Vec<RawCell>)> = Vec::new();

    for (row, record) in records.iter().enumerate() {
        let fields = record
            .as_object()
            .ok_or_else(|| IngestError::JsonLayout(format!("record {} is not an object", row)))?;

        for name in fields.keys() {
            if !columns.iter().any(|(n, _)| n == name) {
                // Column first seen late: earlier rows are missing.
                columns.push((name.clone(), vec![RawCell::Missing; row]));
            }
        }
        for (name, cells) in columns.iter_mut() {
            cells.push(fields.get(name).map(to_cell).unwrap_or(RawCell::Missing));
        }
    }

    Ok(columns)
}

fn from_columns(columns: &Map<String, Value>) -> Result<Vec<(String, Vec<RawCell>)>, IngestError> {
    columns
        .iter()
        .map(|(name, column)| {
            let cells: Vec<RawCell> = match column {
                Value::Array(values) => values.iter().map(to_cell).collect(),
                Value::Object(rows) => {
                    let mut keyed: Vec<(usize, &Value)> = rows
                        .iter()
                        .map(|(key, value)| {
                            key.parse::<usize>().map(|k| (k, value)).map_err(|_| {
                                IngestError::JsonLayout(format!(
                                    "column '{}' has non-numeric row key '{}'",
                                    name, key
                                ))
                            })
                        })
                        .collect::<Result<_, _>>()?;
                    keyed.sort_by_key(|(k, _)| *k);
                    keyed.into_iter().map(|(_, value)| to_cell(value)).collect()
                }
                _ => {
                    return Err(IngestError::JsonLayout(format!(
                        "column '{}' is neither an array nor an object",
                        name
                    )))
                }
            };
            Ok((name.clone(), cells))
        })
        .collect()
}

fn to_cell(value: &Value) -> RawCell {
    match value {
        Value::Number(n) => n.as_f64().map(RawCell::Number).unwrap_or(RawCell::Missing),
        Value::String(s) if s.trim().is_empty() => RawCell::Missing,
        Value::String(s) => RawCell::Text(s.clone()),
        Value::Null => RawCell::Missing,
        other => RawCell::Text(other.to_string()),
    }
}
