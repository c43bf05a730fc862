use std::fmt::Display;

use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, Offset as _, TimeDelta,
    TimeZone, Utc,
};

const DISPLAY: &str = "%Y-%m-%d %H:%M:%S";
const INSTANT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

// what a date-time form field produces
const LOCAL_INPUT: [&str; 3] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// The zone timestamps are shown and entered in.
///
/// `Local` follows the host's zone rules, so the offset is resolved for
/// each timestamp rather than once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Zone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl TimeZone for Zone {
    type Offset = FixedOffset;

    fn from_offset(offset: &FixedOffset) -> Self {
        Self::Fixed(*offset)
    }

    #[allow(deprecated)]
    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        match self {
            Self::Local => Local.offset_from_local_date(local),
            Self::Fixed(offset) => LocalResult::Single(*offset),
        }
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        match self {
            Self::Local => Local.offset_from_local_datetime(local),
            Self::Fixed(offset) => LocalResult::Single(*offset),
        }
    }

    #[allow(deprecated)]
    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        match self {
            Self::Local => Local.offset_from_utc_date(utc),
            Self::Fixed(offset) => *offset,
        }
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            Self::Local => Local.offset_from_utc_datetime(utc),
            Self::Fixed(offset) => *offset,
        }
    }
}

/// Neutralizes markup-significant characters so `text` can be placed in
/// element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            ch => out.push(ch),
        }
    }
    out
}

/// Formats an ISO 8601 timestamp for display in `tz`, using the offset in
/// force at that instant.
///
/// Empty input yields an empty string; anything that doesn't parse is
/// returned unchanged.
pub fn format_time<Tz>(iso: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if iso.is_empty() {
        return String::new();
    }

    match parse_instant(iso) {
        Some(ts) => ts.with_timezone(tz).format(DISPLAY).to_string(),
        None => iso.to_string(),
    }
}

/// Converts a form date-time value, read as wall-clock time in `tz`, into
/// an absolute UTC instant such as `2024-01-01T10:00:00.000Z`.
///
/// Ambiguous wall-clock times take the earlier instant. Times skipped by a
/// forward transition use the offset from before it. Values that already
/// carry an offset are converted as-is.
pub fn local_instant<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<String> {
    let input = input.trim();
    let naive = LOCAL_INPUT
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok());

    let utc = match naive {
        Some(naive) => match tz.from_local_datetime(&naive) {
            LocalResult::Single(ts) | LocalResult::Ambiguous(ts, _) => ts.naive_utc(),
            LocalResult::None => {
                let before = tz
                    .offset_from_utc_datetime(&(naive - TimeDelta::days(1)))
                    .fix();
                naive - TimeDelta::seconds(before.local_minus_utc().into())
            }
        },
        None => parse_instant(input)?.naive_utc(),
    };

    Some(Utc.from_utc_datetime(&utc).format(INSTANT).to_string())
}

fn parse_instant(input: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(input)
        .or_else(|_| DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}
