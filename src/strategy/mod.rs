pub mod reducers;
pub mod threshold;

pub use reducers::{
    CentralTendencyReducer, CorrelationReducer, MetricReducer, ScoreMap, VolatilityReducer,
};
pub use threshold::{Threshold, ThresholdSource};

use crate::data::{SeriesTable, TimeWindow, WindowedTable};
use crate::error::{ConfigurationError, Result};
use crate::report::{assemble, Reporter, Verdict};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Scoring strategy. Closed set: every dispatch over it is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Correlation,
    Volatility,
    CentralTendency,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Correlation,
        Strategy::Volatility,
        Strategy::CentralTendency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Correlation => "correlation",
            Strategy::Volatility => "volatility",
            Strategy::CentralTendency => "central-tendency",
        }
    }

    /// What the score of this strategy measures, for summaries.
    pub fn score_label(&self) -> &'static str {
        match self {
            Strategy::Correlation => "Average correlation",
            Strategy::Volatility => "Volatility (std, inverted)",
            Strategy::CentralTendency => "Mean value",
        }
    }

    pub fn reducer(&self) -> &'static dyn MetricReducer {
        static CORRELATION: CorrelationReducer = CorrelationReducer;
        static VOLATILITY: VolatilityReducer = VolatilityReducer;
        static CENTRAL_TENDENCY: CentralTendencyReducer = CentralTendencyReducer;

        match self {
            Strategy::Correlation => &CORRELATION,
            Strategy::Volatility => &VOLATILITY,
            Strategy::CentralTendency => &CENTRAL_TENDENCY,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ConfigurationError;

    fn from_str(mode: &str) -> std::result::Result<Self, Self::Err> {
        match mode.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "correlation" | "corr" => Ok(Strategy::Correlation),
            "volatility" | "std" => Ok(Strategy::Volatility),
            "central-tendency" | "mean" => Ok(Strategy::CentralTendency),
            _ => Err(ConfigurationError::UnknownStrategy(mode.to_string())),
        }
    }
}

/// Runs the window → reduce → threshold → assemble pipeline for one strategy.
///
/// Holds no per-run state; one analyzer can serve any number of concurrent calls.
#[derive(Clone)]
pub struct OutlierAnalyzer {
    strategy: Strategy,
    reporter: Option<Arc<dyn Reporter>>,
}

impl OutlierAnalyzer {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            reporter: None,
        }
    }

    /// Analyzer for a textual mode identifier.
    pub fn from_mode(mode: &str) -> std::result::Result<Self, ConfigurationError> {
        Ok(Self::new(mode.parse()?))
    }

    /// Report every successful verdict through `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Scores only, without threshold or classification.
    pub fn score<S: AsRef<str>>(
        &self,
        table: &SeriesTable,
        streams: &[S],
        window: &TimeWindow,
    ) -> Result<ScoreMap> {
        let view = WindowedTable::select(table, streams, window)?;
        debug!(
            strategy = %self.strategy,
            rows = view.row_count(),
            streams = streams.len(),
            "window selected"
        );

        let scores = self.strategy.reducer().reduce(&view)?;
        Ok(scores)
    }

    /// Full analysis. Errors abort the run; no partial verdict is produced and nothing
    /// is reported.
    pub fn analyze<S: AsRef<str>>(
        &self,
        table: &SeriesTable,
        streams: &[S],
        window: &TimeWindow,
        supplied: Option<f64>,
    ) -> Result<Verdict> {
        let scores = self.score(table, streams, window)?;
        let threshold = threshold::resolve(&scores, supplied)?;
        let flags = threshold::classify(&scores, &threshold);
        debug!(
            strategy = %self.strategy,
            threshold = threshold.value,
            outliers = flags.iter().filter(|f| **f).count(),
            "streams classified"
        );

        let verdict = assemble(self.strategy, &scores, threshold, &flags);
        if let Some(reporter) = &self.reporter {
            reporter.report(&verdict);
        }

        Ok(verdict)
    }
}

impl fmt::Debug for OutlierAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlierAnalyzer")
            .field("strategy", &self.strategy)
            .field("reporter", &self.reporter.is_some())
            .finish()
    }
}

/// Run one strategy without a reporter.
pub fn analyze<S: AsRef<str>>(
    strategy: Strategy,
    table: &SeriesTable,
    streams: &[S],
    window: &TimeWindow,
    threshold: Option<f64>,
) -> Result<Verdict> {
    OutlierAnalyzer::new(strategy).analyze(table, streams, window, threshold)
}

/// Run the strategy named by `mode`.
///
/// An unknown mode fails before any reducer runs and before anything is reported.
pub fn analyze_mode<S: AsRef<str>>(
    mode: &str,
    table: &SeriesTable,
    streams: &[S],
    window: &TimeWindow,
    threshold: Option<f64>,
    reporter: Option<Arc<dyn Reporter>>,
) -> Result<Verdict> {
    let mut analyzer = OutlierAnalyzer::from_mode(mode)?;
    if let Some(reporter) = reporter {
        analyzer = analyzer.with_reporter(reporter);
    }
    analyzer.analyze(table, streams, window, threshold)
}

/// Flag streams whose average correlation with their peers is unusually low.
pub fn analyze_correlation<S: AsRef<str>>(
    table: &SeriesTable,
    streams: &[S],
    start: NaiveDateTime,
    end: NaiveDateTime,
    threshold: Option<f64>,
) -> Result<Verdict> {
    analyze(Strategy::Correlation, table, streams, &TimeWindow::new(start, end), threshold)
}

/// Flag streams by negated volatility.
pub fn analyze_volatility<S: AsRef<str>>(
    table: &SeriesTable,
    streams: &[S],
    start: NaiveDateTime,
    end: NaiveDateTime,
    threshold: Option<f64>,
) -> Result<Verdict> {
    analyze(Strategy::Volatility, table, streams, &TimeWindow::new(start, end), threshold)
}

/// Flag streams whose mean level is unusually low.
pub fn analyze_central_tendency<S: AsRef<str>>(
    table: &SeriesTable,
    streams: &[S],
    start: NaiveDateTime,
    end: NaiveDateTime,
    threshold: Option<f64>,
) -> Result<Verdict> {
    analyze(
        Strategy::CentralTendency,
        table,
        streams,
        &TimeWindow::new(start, end),
        threshold,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnalysisError, DataError};
    use crate::report::CollectingReporter;
    use crate::strategy::reducers::fixtures::{table, ts};

    #[test]
    fn test_parse_modes() {
        assert_eq!("correlation".parse::<Strategy>(), Ok(Strategy::Correlation));
        assert_eq!("Volatility".parse::<Strategy>(), Ok(Strategy::Volatility));
        assert_eq!("central_tendency".parse::<Strategy>(), Ok(Strategy::CentralTendency));
        assert_eq!("mean".parse::<Strategy>(), Ok(Strategy::CentralTendency));
        assert_eq!(
            "median".parse::<Strategy>(),
            Err(ConfigurationError::UnknownStrategy("median".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
            assert_eq!(strategy.reducer().name(), strategy.as_str());
        }
    }

    #[test]
    fn test_unknown_mode_reports_nothing() {
        let t = table(&[("a", &[1.0, 2.0]), ("b", &[2.0, 1.0]), ("c", &[3.0, 3.5])]);
        let window = TimeWindow::covering(&t).unwrap();
        let reporter = Arc::new(CollectingReporter::new());

        let err = analyze_mode(
            "zscore",
            &t,
            &["a", "b", "c"],
            &window,
            None,
            Some(reporter.clone() as Arc<dyn Reporter>),
        )
        .unwrap_err();

        assert!(err.is_configuration());
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_reporter_receives_summary() {
        let t = table(&[
            ("a", &[100.0, 100.0]),
            ("b", &[102.0, 102.0]),
            ("c", &[5.0, 5.0]),
        ]);
        let window = TimeWindow::covering(&t).unwrap();
        let reporter = Arc::new(CollectingReporter::new());
        let analyzer =
            OutlierAnalyzer::new(Strategy::CentralTendency).with_reporter(reporter.clone());

        let verdict = analyzer.analyze(&t, &["a", "b", "c"], &window, None).unwrap();

        assert_eq!(reporter.summaries(), vec![verdict.summary()]);
    }

    #[test]
    fn test_error_is_not_reported() {
        let t = table(&[("a", &[1.0]), ("b", &[2.0]), ("c", &[3.0])]);
        let reporter = Arc::new(CollectingReporter::new());
        let analyzer = OutlierAnalyzer::new(Strategy::Volatility).with_reporter(reporter.clone());

        // Single row: every score is NaN, so no threshold can be derived.
        let err = analyzer
            .analyze(&t, &["a", "b", "c"], &TimeWindow::new(ts(0), ts(0)), None)
            .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::Data(DataError::InsufficientScores { required: 2, got: 0 })
        );
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_insufficient_streams_checked_first() {
        let t = table(&[("a", &[1.0]), ("b", &[2.0])]);
        // Window is empty as well; the stream count must win.
        let err = analyze_correlation(&t, &["a", "b"], ts(10), ts(20), None).unwrap_err();
        assert!(err.is_configuration());
    }
}
