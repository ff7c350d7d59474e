use super::verdict::Verdict;
use std::sync::Mutex;
use tracing::info;

/// Sink for the textual summary of a finished analysis.
///
/// The analysis core hands reporters a finished verdict and never reads anything
/// back, so swapping reporters cannot change a result.
pub trait Reporter: Send + Sync {
    fn report(&self, verdict: &Verdict);
}

/// Emits the summary as `tracing` events, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, verdict: &Verdict) {
        for line in verdict.summary().lines() {
            info!(strategy = %verdict.strategy(), "{}", line);
        }
    }
}

/// Prints the summary to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&self, verdict: &Verdict) {
        println!("{}", verdict.summary());
        println!();
    }
}

/// Keeps every summary it receives. Handy for tests and for callers that want to
/// render the text somewhere else.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    summaries: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.summaries
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.lock().map(|s| s.is_empty()).unwrap_or(true)
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, verdict: &Verdict) {
        if let Ok(mut summaries) = self.summaries.lock() {
            summaries.push(verdict.summary());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::assemble;
    use crate::strategy::reducers::ScoreMap;
    use crate::strategy::threshold::{Threshold, ThresholdSource};
    use crate::strategy::Strategy;

    #[test]
    fn test_collecting_reporter() {
        let scores: ScoreMap = vec![("a", 1.0), ("b", 2.0), ("c", 3.0)].into_iter().collect();
        let verdict = assemble(
            Strategy::Volatility,
            &scores,
            Threshold {
                value: 0.0,
                source: ThresholdSource::Supplied,
            },
            &[false, false, false],
        );

        let reporter = CollectingReporter::new();
        assert!(reporter.is_empty());

        reporter.report(&verdict);
        let summaries = reporter.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0], verdict.summary());
    }
}
