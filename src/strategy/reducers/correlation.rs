use super::{MetricReducer, ScoreMap};
use crate::data::WindowedTable;
use crate::error::DataError;
use crate::utils::stats::pearson;

/// Cross-stream correlation reducer
///
/// A stream that moves out of step with its peers has a low average correlation
/// with them.
///
/// Algorithm:
/// 1. Pearson correlation for every pair of requested streams (pairwise-complete rows)
/// 2. Score of a stream = arithmetic mean of its coefficients with the n−1 *other*
///    streams; the diagonal is excluded, not averaged in
/// 3. A NaN coefficient (constant stream, too few complete rows) makes every average
///    it takes part in NaN
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationReducer;

impl CorrelationReducer {
    pub fn new() -> Self {
        Self
    }

    /// Symmetric correlation matrix in the window's stream order. Diagonal is 1.0.
    pub fn correlation_matrix(window: &WindowedTable<'_>) -> Vec<Vec<f64>> {
        let columns = window.columns();
        let n = columns.len();
        let mut matrix = vec![vec![1.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let r = pearson(columns[i], columns[j]);
                matrix[i][j] = r;
                matrix[j][i] = r;
            }
        }

        matrix
    }
}

impl MetricReducer for CorrelationReducer {
    fn name(&self) -> &'static str {
        "correlation"
    }

    fn reduce(&self, window: &WindowedTable<'_>) -> Result<ScoreMap, DataError> {
        window.ensure_observations()?;

        let matrix = Self::correlation_matrix(window);
        let peers = (matrix.len() - 1) as f64;

        Ok(window
            .streams()
            .iter()
            .enumerate()
            .map(|(i, stream)| {
                let sum: f64 = matrix[i]
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, r)| r)
                    .sum();
                (*stream, sum / peers)
            })
            .collect())
    }
}
