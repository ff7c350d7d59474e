pub mod data;
pub mod error;
pub mod ingest;
pub mod report;
pub mod strategy;
pub mod utils;

// Re-export commonly used types
pub use data::{SeriesTable, TimeWindow, WindowedTable};
pub use error::{AnalysisError, ConfigurationError, DataError, Result, TableError};
pub use ingest::{load_table, IngestError};
pub use report::{
    CollectingReporter, Reporter, StdoutReporter, StreamVerdict, TracingReporter, Verdict,
};
pub use strategy::{
    analyze, analyze_central_tendency, analyze_correlation, analyze_mode, analyze_volatility,
    MetricReducer, OutlierAnalyzer, ScoreMap, Strategy, Threshold, ThresholdSource,
};
pub use utils::Config;
