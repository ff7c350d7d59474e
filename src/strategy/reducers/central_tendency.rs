use super::{per_stream, MetricReducer, ScoreMap};
use crate::data::WindowedTable;
use crate::error::DataError;
use crate::utils::stats::mean;

/// Central-tendency reducer
///
/// Score = arithmetic mean over the window, used as-is: a stream whose level sits
/// well below its peers is the anomaly. Unlike the volatility reducer there is no
/// sign flip.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentralTendencyReducer;

impl CentralTendencyReducer {
    pub fn new() -> Self {
        Self
    }
}

impl MetricReducer for CentralTendencyReducer {
    fn name(&self) -> &'static str {
        "central-tendency"
    }

    fn reduce(&self, window: &WindowedTable<'_>) -> Result<ScoreMap, DataError> {
        per_stream(window, mean)
    }
}
