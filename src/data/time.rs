use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A parsed timestamp together with whether the source text carried a time of day.
///
/// Date-only bounds matter for windows: an end bound of `2024-01-02` covers the whole
/// day, the same way partial-date slicing does in dataframe libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTime {
    Instant(NaiveDateTime),
    Date(NaiveDate),
}

impl ParsedTime {
    /// Earliest instant covered.
    pub fn floor(self) -> NaiveDateTime {
        match self {
            ParsedTime::Instant(t) => t,
            ParsedTime::Date(d) => d.and_time(chrono::NaiveTime::MIN),
        }
    }

    /// Latest instant covered.
    pub fn ceil(self) -> NaiveDateTime {
        match self {
            ParsedTime::Instant(t) => t,
            ParsedTime::Date(d) => d
                .succ_opt()
                .map(|next| next.and_time(chrono::NaiveTime::MIN) - chrono::Duration::nanoseconds(1))
                .unwrap_or(NaiveDateTime::MAX),
        }
    }
}

/// Parse a timestamp in any of the accepted textual forms.
///
/// RFC 3339 values with an offset are normalised to UTC.
pub fn parse_time(text: &str) -> Option<ParsedTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(ParsedTime::Instant(dt.naive_utc()));
    }

    for format in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ParsedTime::Instant(t));
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .map(ParsedTime::Date)
}

/// Parse a timestamp and resolve it to a single instant (dates become midnight).
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    parse_time(text).map(ParsedTime::floor)
}
