pub mod table;
pub mod time;
pub mod window;

pub use table::SeriesTable;
pub use time::{parse_time, parse_timestamp, ParsedTime};
pub use window::{TimeWindow, WindowedTable, MIN_STREAMS};
