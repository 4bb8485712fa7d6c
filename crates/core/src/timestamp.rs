//! Parsing of upstream ISO-8601 timestamps.

use chrono::{DateTime, Utc};

use crate::error::CoreError;

/// Parse a catalog `created` value into a UTC timestamp.
///
/// The catalog emits values such as `2017-11-04T18:48:46.250Z`. A trailing
/// `Z` zone marker is rewritten to an explicit `+00:00` offset before the
/// value is parsed as RFC 3339; any other explicit offset is honoured and
/// converted to UTC.
///
/// # Examples
///
/// ```
/// use multiverse_core::timestamp::parse_upstream_timestamp;
///
/// let ts = parse_upstream_timestamp("2020-01-01T00:00:00Z").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2020-01-01T00:00:00+00:00");
/// ```
pub fn parse_upstream_timestamp(value: &str) -> Result<DateTime<Utc>, CoreError> {
    let normalized = match value.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => value.to_string(),
    };

    DateTime::parse_from_rfc3339(&normalized)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| CoreError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
