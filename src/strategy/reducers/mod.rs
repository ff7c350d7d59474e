pub mod central_tendency;
pub mod correlation;
pub mod volatility;

pub use central_tendency::CentralTendencyReducer;
pub use correlation::CorrelationReducer;
pub use volatility::VolatilityReducer;

use crate::data::WindowedTable;
use crate::error::DataError;
use serde::{Deserialize, Serialize};

/// Reduces a windowed table to one score per stream.
///
/// Scores are oriented so that lower means more anomalous. Implementations are pure
/// functions of the window and reject empty windows with [`DataError::EmptyWindow`].
pub trait MetricReducer: Send + Sync {
    /// Label used in summaries and logs.
    fn name(&self) -> &'static str;

    fn reduce(&self, window: &WindowedTable<'_>) -> Result<ScoreMap, DataError>;
}

/// One score per analyzed stream, kept in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreMap {
    entries: Vec<(String, f64)>,
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the score of `stream`.
    pub fn insert(&mut self, stream: impl Into<String>, score: f64) {
        let stream = stream.into();
        match self.entries.iter_mut().find(|(s, _)| *s == stream) {
            Some(entry) => entry.1 = score,
            None => self.entries.push((stream, score)),
        }
    }

    pub fn get(&self, stream: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == stream)
            .map(|(_, score)| *score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn streams(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, score)| (s.as_str(), *score))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ScoreMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = ScoreMap::new();
        for (stream, score) in iter {
            map.insert(stream, score);
        }
        map
    }
}

/// Apply a per-column statistic to every stream of the window.
pub(crate) fn per_stream<F>(window: &WindowedTable<'_>, statistic: F) -> Result<ScoreMap, DataError>
where
    F: Fn(&[f64]) -> f64,
{
    window.ensure_observations()?;
    Ok(window
        .iter()
        .map(|(stream, values)| (stream, statistic(values)))
        .collect())
}
