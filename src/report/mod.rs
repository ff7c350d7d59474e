pub mod reporter;
pub mod verdict;

pub use reporter::{CollectingReporter, Reporter, StdoutReporter, TracingReporter};
pub use verdict::{assemble, StreamVerdict, Verdict};
