use super::{IngestError, RawCell};

/// Read a delimited text table into named raw columns. Empty cells are missing.
pub fn read_columns(contents: &str, delimiter: u8) -> Result<Vec<(String, Vec<RawCell>)>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let headers = reader.headers()?.clone();
    let mut columns: Vec<(String, Vec<RawCell>)> = headers
        .iter()
        .map(|name| (name.to_string(), Vec::new()))
        .collect();

    for record in reader.records() {
        let record = record?;
        for (idx, (_, cells)) in columns.iter_mut().enumerate() {
            let cell = match record.get(idx) {
                Some(field) if !field.is_empty() => RawCell::Text(field.to_string()),
                _ => RawCell::Missing,
            };
            cells.push(cell);
        }
    }

    Ok(columns)
}
