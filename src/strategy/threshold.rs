use super::reducers::ScoreMap;
use crate::error::DataError;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Fewest finite scores the derived threshold is defined for.
pub const MIN_FINITE_SCORES: usize = 2;

/// Where the threshold of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    Supplied,
    Derived,
}

/// Threshold decision for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,
    pub source: ThresholdSource,
}

impl Threshold {
    /// `score < threshold`, strictly. NaN scores are never outliers.
    pub fn flags(&self, score: f64) -> bool {
        score < self.value
    }
}

/// Resolve the threshold for a score map.
///
/// A supplied value is used verbatim. Otherwise the threshold is
/// `mean - sample_std` over the finite scores; NaN and infinite scores are left out of
/// the derivation.
pub fn resolve(scores: &ScoreMap, supplied: Option<f64>) -> Result<Threshold, DataError> {
    if let Some(value) = supplied {
        return Ok(Threshold {
            value,
            source: ThresholdSource::Supplied,
        });
    }

    let finite: Vec<f64> = scores.scores().filter(|s| s.is_finite()).collect();
    if finite.len() < MIN_FINITE_SCORES {
        return Err(DataError::InsufficientScores {
            required: MIN_FINITE_SCORES,
            got: finite.len(),
        });
    }

    let mean = finite.iter().mean();
    let std_dev = finite.iter().std_dev();

    Ok(Threshold {
        value: mean - std_dev,
        source: ThresholdSource::Derived,
    })
}

/// Per-stream outlier flags, in score map order.
pub fn classify(scores: &ScoreMap, threshold: &Threshold) -> Vec<bool> {
    scores.scores().map(|score| threshold.flags(score)).collect()
}
