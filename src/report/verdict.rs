use crate::strategy::reducers::ScoreMap;
use crate::strategy::threshold::{Threshold, ThresholdSource};
use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Outcome for one stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamVerdict {
    pub stream: String,
    pub score: f64,
    pub is_outlier: bool,
}

/// Result of one analysis invocation.
///
/// Built once by [`assemble`] and never mutated afterwards; reporters and display
/// code only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    strategy: Strategy,
    threshold: Threshold,
    streams: Vec<StreamVerdict>,
}

impl Verdict {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.value
    }

    pub fn threshold_detail(&self) -> Threshold {
        self.threshold
    }

    /// Per-stream outcomes in request order.
    pub fn streams(&self) -> &[StreamVerdict] {
        &self.streams
    }

    pub fn get(&self, stream: &str) -> Option<&StreamVerdict> {
        self.streams.iter().find(|v| v.stream == stream)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Streams flagged as outliers, in request order.
    pub fn outliers(&self) -> impl Iterator<Item = &StreamVerdict> {
        self.streams.iter().filter(|v| v.is_outlier)
    }

    pub fn outlier_count(&self) -> usize {
        self.outliers().count()
    }

    /// Scores back as a map, in request order.
    pub fn scores(&self) -> ScoreMap {
        self.streams
            .iter()
            .map(|v| (v.stream.as_str(), v.score))
            .collect()
    }

    /// Deterministic human-readable report: scores in request order, the threshold,
    /// and the flagged subset.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let width = self
            .streams
            .iter()
            .map(|v| v.stream.len())
            .max()
            .unwrap_or(0);

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{} of each stream:", self.strategy.score_label());
        for v in &self.streams {
            let _ = writeln!(out, "  {:<width$}  {}", v.stream, format_score(v.score));
        }

        let _ = writeln!(
            out,
            "Outlier threshold ({}): {}",
            match self.threshold.source {
                ThresholdSource::Supplied => "supplied",
                ThresholdSource::Derived => "mean - std",
            },
            format_score(self.threshold.value)
        );

        let flagged: Vec<&str> = self.outliers().map(|v| v.stream.as_str()).collect();
        if flagged.is_empty() {
            let _ = write!(out, "Suspected outlier streams: none");
        } else {
            let _ = write!(out, "Suspected outlier streams: {}", flagged.join(", "));
        }

        out
    }
}

fn format_score(score: f64) -> String {
    if score.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", score)
    }
}

/// Package scores, threshold and flags into a verdict.
///
/// `flags` must be aligned with `scores`.
pub fn assemble(strategy: Strategy, scores: &ScoreMap, threshold: Threshold, flags: &[bool]) -> Verdict {
    debug_assert_eq!(scores.len(), flags.len());

    let streams = scores
        .iter()
        .zip(flags)
        .map(|((stream, score), &is_outlier)| StreamVerdict {
            stream: stream.to_string(),
            score,
            is_outlier,
        })
        .collect();

    Verdict {
        strategy,
        threshold,
        streams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Verdict {
        let scores: ScoreMap = vec![("b", 102.0), ("a", 100.0), ("c", 5.0)]
            .into_iter()
            .collect();
        let threshold = Threshold {
            value: 13.5,
            source: ThresholdSource::Derived,
        };
        assemble(Strategy::CentralTendency, &scores, threshold, &[false, false, true])
    }

    #[test]
    fn test_assemble() {
        let verdict = sample();

        assert_eq!(verdict.len(), 3);
        assert_eq!(verdict.threshold(), 13.5);
        assert_eq!(verdict.strategy(), Strategy::CentralTendency);
        assert!(verdict.get("c").unwrap().is_outlier);
        assert!(!verdict.get("a").unwrap().is_outlier);
        assert_eq!(verdict.outlier_count(), 1);
        assert_eq!(verdict.scores().get("b"), Some(102.0));
    }

    #[test]
    fn test_summary_text() {
        let summary = sample().summary();
        let expected = "\
Mean value of each stream:
  b  102.000000
  a  100.000000
  c  5.000000
Outlier threshold (mean - std): 13.500000
Suspected outlier streams: c";

        assert_eq!(summary, expected);
    }

    #[test]
    fn test_summary_without_outliers_shows_nan() {
        let scores: ScoreMap = vec![("x", f64::NAN), ("y", 1.0), ("z", 2.0)]
            .into_iter()
            .collect();
        let threshold = Threshold {
            value: -0.5,
            source: ThresholdSource::Supplied,
        };
        let verdict = assemble(Strategy::Correlation, &scores, threshold, &[false, false, false]);
        let summary = verdict.summary();

        assert!(summary.contains("  x  NaN\n"));
        assert!(summary.contains("Outlier threshold (supplied): -0.500000"));
        assert!(summary.ends_with("Suspected outlier streams: none"));
    }

    #[test]
    fn test_summary_does_not_alter_verdict() {
        let verdict = sample();
        let before = verdict.clone();
        let _ = verdict.summary();
        assert_eq!(verdict, before);
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["strategy"], "central-tendency");
        assert_eq!(json["threshold"]["source"], "derived");
        assert_eq!(json["streams"][2]["stream"], "c");
        assert_eq!(json["streams"][2]["is_outlier"], true);
    }
}
