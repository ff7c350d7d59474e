use super::{per_stream, MetricReducer, ScoreMap};
use crate::data::WindowedTable;
use crate::error::DataError;
use crate::utils::stats::sample_std_dev;

/// Volatility reducer
///
/// Score = −(sample standard deviation over the window). The negation keeps the
/// shared "lower is more anomalous" rule, so under the default threshold it is an
/// unusually *volatile* stream that falls below the cutoff.
///
/// A stream with fewer than two observations in the window scores NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityReducer;

impl VolatilityReducer {
    pub fn new() -> Self {
        Self
    }
}

impl MetricReducer for VolatilityReducer {
    fn name(&self) -> &'static str {
        "volatility"
    }

    fn reduce(&self, window: &WindowedTable<'_>) -> Result<ScoreMap, DataError> {
        per_stream(window, |values| -sample_std_dev(values))
    }
}
