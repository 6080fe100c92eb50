//! Canonical timestamp handling shared by every storage backend.
//!
//! Persisted form is RFC 3339 UTC with exactly six fractional digits and a `Z`
//! suffix. The width never varies, so persisted values also sort correctly as text.

use chrono::{DateTime, NaiveDateTime, ParseError, SecondsFormat, Timelike, Utc};

/// Current UTC time truncated to microsecond precision.
pub fn now() -> DateTime<Utc> {
    truncate_to_micros(Utc::now())
}

pub fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = ts.nanosecond();
    ts.with_nanosecond(nanos - nanos % 1_000).unwrap_or(ts)
}

/// Formats `ts` in the canonical persisted form, e.g. `2026-10-16T09:30:00.123456Z`.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a persisted timestamp.
///
/// Accepts any RFC 3339 value, and also offset-less ISO-8601 values
/// (`2025-01-31T10:00:00.123456`), which are read as UTC.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}
