//! Timestamps and their canonical text form.
//!
//! Every timestamp in the system is UTC. Persisted timestamps use RFC 3339
//! with nanosecond precision so that lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp used for creation, update and grading times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp in the canonical stored form.
#[must_use]
pub fn to_stored(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a timestamp written by [`to_stored`] (any RFC 3339 offset is accepted).
///
/// # Errors
///
/// Returns [`chrono::ParseError`] when `text` is not RFC 3339.
pub fn from_stored(text: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.to_utc())
}
