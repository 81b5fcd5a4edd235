//! Publish-time parsing and the freshness window.
//!
//! Feeds disagree on date formats and some lie outright. Parsing never fails
//! the entry: anything unreadable gets a fallback timestamp of `now - fallback_age`
//! so it can still compete, just with pessimistic recency.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

pub const DEFAULT_MAX_AGE_HOURS: i64 = 48;
pub const DEFAULT_FALLBACK_AGE_DAYS: i64 = 2;

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = OffsetDateTime::parse(ts, &Rfc2822) {
        return Utc
            .timestamp_opt(dt.unix_timestamp(), dt.nanosecond())
            .single();
    }
    // chrono also understands the obsolete US zone names (EST, PDT, ...)
    DateTime::parse_from_rfc2822(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a feed timestamp. Naive values are taken as UTC.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(dt) = parse_rfc2822(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// A resolved publish time and whether it came from the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Published {
    pub at: DateTime<Utc>,
    pub fallback: bool,
}

/// Resolve the entry's publish time, substituting `now - fallback_age` when absent or unparseable.
pub fn resolve_published(raw: Option<&str>, now: DateTime<Utc>, fallback_age: Duration) -> Published {
    match raw.and_then(parse_published) {
        Some(at) => Published { at, fallback: false },
        None => Published {
            at: now
                .checked_sub_signed(fallback_age)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            fallback: true,
        },
    }
}

/// True unless `published` is strictly older than `now - max_age`.
/// A window reaching past the earliest representable time admits everything.
pub fn is_fresh(published: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    match now.checked_sub_signed(max_age) {
        Some(cutoff) => published >= cutoff,
        None => true,
    }
}
