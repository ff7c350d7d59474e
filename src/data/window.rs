use super::table::SeriesTable;
use super::time::parse_time;
use crate::error::{ConfigurationError, DataError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minimum number of streams a peer comparison needs.
pub const MIN_STREAMS: usize = 3;

/// Closed time interval `[start, end]`.
///
/// An inverted interval is accepted and simply selects no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Parse textual bounds. A date-only end bound covers the whole day.
    pub fn parse(start: &str, end: &str) -> Result<Self, ConfigurationError> {
        let start_bound = parse_time(start)
            .ok_or_else(|| ConfigurationError::InvalidTimestamp(start.to_string()))?;
        let end_bound =
            parse_time(end).ok_or_else(|| ConfigurationError::InvalidTimestamp(end.to_string()))?;

        Ok(Self {
            start: start_bound.floor(),
            end: end_bound.ceil(),
        })
    }

    /// Window spanning every row of the table.
    pub fn covering(table: &SeriesTable) -> Option<Self> {
        let timestamps = table.timestamps();
        Some(Self {
            start: *timestamps.first()?,
            end: *timestamps.last()?,
        })
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Borrowed view of a series table restricted to a window and a stream subset.
#[derive(Debug, Clone)]
pub struct WindowedTable<'a> {
    timestamps: &'a [NaiveDateTime],
    streams: Vec<&'a str>,
    columns: Vec<&'a [f64]>,
}

impl<'a> WindowedTable<'a> {
    /// Slice `table` to the rows inside `window` and the requested streams.
    ///
    /// Stream preconditions are checked before any row is looked at. A window that
    /// selects no rows is returned as-is; reducers reject it via [`Self::ensure_observations`].
    pub fn select<S: AsRef<str>>(
        table: &'a SeriesTable,
        streams: &[S],
        window: &TimeWindow,
    ) -> Result<Self, ConfigurationError> {
        validate_streams(table, streams)?;

        // Time axis is sorted, so the window is one contiguous run of rows.
        let timestamps = table.timestamps();
        let lo = timestamps.partition_point(|t| *t < window.start);
        let hi = timestamps.partition_point(|t| *t <= window.end).max(lo);

        let mut names = Vec::with_capacity(streams.len());
        let mut columns = Vec::with_capacity(streams.len());
        for stream in streams {
            let name = stream.as_ref();
            let (name, column) = table
                .entry(name)
                .ok_or_else(|| ConfigurationError::UnknownStream(name.to_string()))?;
            names.push(name);
            columns.push(&column[lo..hi]);
        }

        Ok(Self {
            timestamps: &timestamps[lo..hi],
            streams: names,
            columns,
        })
    }

    pub fn row_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &'a [NaiveDateTime] {
        self.timestamps
    }

    /// Requested stream identifiers, in request order.
    pub fn streams(&self) -> &[&'a str] {
        &self.streams
    }

    /// Column slices aligned with [`Self::streams`].
    pub fn columns(&self) -> &[&'a [f64]] {
        &self.columns
    }

    /// `(name, values)` pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a [f64])> + '_ {
        self.streams.iter().copied().zip(self.columns.iter().copied())
    }

    /// Every reducer calls this first so zero-row windows fail the same way everywhere.
    pub fn ensure_observations(&self) -> Result<(), DataError> {
        if self.is_empty() {
            return Err(DataError::EmptyWindow);
        }
        Ok(())
    }
}

fn validate_streams<S: AsRef<str>>(
    table: &SeriesTable,
    streams: &[S],
) -> Result<(), ConfigurationError> {
    if streams.len() < MIN_STREAMS {
        return Err(ConfigurationError::InsufficientStreams {
            required: MIN_STREAMS,
            got: streams.len(),
        });
    }

    let mut seen = HashSet::with_capacity(streams.len());
    for stream in streams {
        let name = stream.as_ref();
        if !seen.insert(name) {
            return Err(ConfigurationError::DuplicateStream(name.to_string()));
        }
        if !table.has_stream(name) {
            return Err(ConfigurationError::UnknownStream(name.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample_table() -> SeriesTable {
        SeriesTable::new(
            "created_at",
            (0..6).map(ts).collect(),
            vec![
                ("a".to_string(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]),
                ("b".to_string(), vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0]),
                ("c".to_string(), vec![20.0, 21.0, 22.0, 23.0, 24.0, 25.0]),
                ("d".to_string(), vec![30.0, 31.0, 32.0, 33.0, 34.0, 35.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_closed_window_bounds() {
        let table = sample_table();
        let window = TimeWindow::new(ts(1), ts(3));
        let view = WindowedTable::select(&table, &["c", "a", "b"], &window).unwrap();

        assert_eq!(view.row_count(), 3);
        assert_eq!(view.streams(), &["c", "a", "b"]);
        assert_eq!(view.columns()[0], &[21.0, 22.0, 23.0]);
        assert_eq!(view.columns()[1], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_window_outside_data_is_empty() {
        let table = sample_table();
        let window = TimeWindow::new(ts(10), ts(12));
        let view = WindowedTable::select(&table, &["a", "b", "c"], &window).unwrap();

        assert!(view.is_empty());
        assert_eq!(view.ensure_observations(), Err(DataError::EmptyWindow));
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let table = sample_table();
        let window = TimeWindow::new(ts(4), ts(1));
        let view = WindowedTable::select(&table, &["a", "b", "c"], &window).unwrap();

        assert_eq!(view.row_count(), 0);
        assert!(view.columns().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_insufficient_streams() {
        let table = sample_table();
        let window = TimeWindow::covering(&table).unwrap();
        let err = WindowedTable::select(&table, &["a", "b"], &window).unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::InsufficientStreams { required: 3, got: 2 }
        );
    }

    #[test]
    fn test_unknown_and_duplicate_streams() {
        let table = sample_table();
        let window = TimeWindow::covering(&table).unwrap();

        let err = WindowedTable::select(&table, &["a", "b", "zz"], &window).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownStream("zz".to_string()));

        let err = WindowedTable::select(&table, &["a", "b", "a"], &window).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateStream("a".to_string()));
    }

    #[test]
    fn test_parse_date_only_window() {
        let window = TimeWindow::parse("2024-01-01", "2024-01-01").unwrap();
        assert!(window.contains(ts(0)));
        assert!(window.contains(ts(23)));

        let err = TimeWindow::parse("yesterday", "2024-01-01").unwrap_err();
        assert_eq!(err, ConfigurationError::InvalidTimestamp("yesterday".to_string()));
    }
}
