//! Relative time formatting shared by every table view.
//!
//! Past instants render as `"3h ago"`, future ones as `"in 3h"`. Bucket
//! boundaries use integer floor division on whole seconds:
//!
//! | Seconds        | Past          | Future        |
//! |----------------|---------------|---------------|
//! | `< 60`         | `just now`    | `in a moment` |
//! | `< 3600`       | `{n}m ago`    | `in {n}m`     |
//! | `< 86400`      | `{n}h ago`    | `in {n}h`     |
//! | `< 604800`     | `{n}d ago`    | `in {n}d`     |
//! | `< 2592000`    | `{n}w ago`    | `in {n}w`     |
//! | `>= 2592000`   | `{n}mo ago`   | `in {n}w`     |
//!
//! Future formatting stops at weeks unless
//! [`RelativeTimeFormatter::extend_future_to_months`] is set.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 604_800;
const MONTH: i64 = 2_592_000;

/// Naive layouts accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a caller-supplied timestamp string.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS[.fff]]` (with a space or `T`
/// separator) and bare `YYYY-MM-DD`. Naive values are taken as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidTimestamp(input.to_string()));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    for layout in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    tracing::debug!(input = %input, "rejected timestamp");
    Err(Error::InvalidTimestamp(input.to_string()))
}

/// Build an instant from Unix epoch seconds.
pub fn from_epoch_seconds(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| Error::InvalidTimestamp(secs.to_string()))
}

/// Build an instant from Unix epoch milliseconds.
pub fn from_epoch_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| Error::InvalidTimestamp(millis.to_string()))
}

/// Coarse unit a relative time is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeTimeBucket {
    JustNow,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

impl RelativeTimeBucket {
    /// Suffix used after the count (`m`, `h`, `d`, `w`, `mo`)
    pub fn unit(&self) -> &'static str {
        match self {
            RelativeTimeBucket::JustNow => "",
            RelativeTimeBucket::Minutes => "m",
            RelativeTimeBucket::Hours => "h",
            RelativeTimeBucket::Days => "d",
            RelativeTimeBucket::Weeks => "w",
            RelativeTimeBucket::Months => "mo",
        }
    }

    /// Seconds per unit of this bucket
    fn divisor(&self) -> i64 {
        match self {
            RelativeTimeBucket::JustNow => 1,
            RelativeTimeBucket::Minutes => MINUTE,
            RelativeTimeBucket::Hours => HOUR,
            RelativeTimeBucket::Days => DAY,
            RelativeTimeBucket::Weeks => WEEK,
            RelativeTimeBucket::Months => MONTH,
        }
    }
}

/// Whether the target lies before or after the reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Past,
    Future,
}

/// A classified relative time, rendered through [`fmt::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelativeTime {
    pub direction: Direction,
    pub bucket: RelativeTimeBucket,
    /// Whole units in `bucket` (0 for [`RelativeTimeBucket::JustNow`])
    pub count: i64,
}

impl fmt::Display for RelativeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.direction, self.bucket) {
            (Direction::Past, RelativeTimeBucket::JustNow) => write!(f, "just now"),
            (Direction::Future, RelativeTimeBucket::JustNow) => write!(f, "in a moment"),
            (Direction::Past, bucket) => write!(f, "{}{} ago", self.count, bucket.unit()),
            (Direction::Future, bucket) => write!(f, "in {}{}", self.count, bucket.unit()),
        }
    }
}

/// Converts absolute instants into relative strings.
///
/// Callers rendering several values at once should pass the same `reference`
/// to every call so the whole table agrees on "now".
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeTimeFormatter {
    /// Render far-future instants as months (`in 2mo`) instead of weeks
    pub extend_future_to_months: bool,
}

impl RelativeTimeFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `target` relative to `reference`.
    pub fn classify(&self, target: DateTime<Utc>, reference: DateTime<Utc>) -> RelativeTime {
        let millis = reference.signed_duration_since(target).num_milliseconds();
        let delta = millis.div_euclid(1000);

        if delta >= 0 {
            let bucket = past_bucket(delta);
            RelativeTime {
                direction: Direction::Past,
                bucket,
                count: delta / bucket.divisor(),
            }
        } else {
            let ahead = (-millis).div_euclid(1000);
            let bucket = self.future_bucket(ahead);
            RelativeTime {
                direction: Direction::Future,
                bucket,
                count: ahead / bucket.divisor(),
            }
        }
    }

    /// Format `target` relative to `reference`.
    pub fn format(&self, target: DateTime<Utc>, reference: DateTime<Utc>) -> String {
        self.classify(target, reference).to_string()
    }

    /// Parse `target` and format it relative to `reference`.
    pub fn format_str(&self, target: &str, reference: DateTime<Utc>) -> Result<String> {
        let target = parse_timestamp(target)?;
        Ok(self.format(target, reference))
    }

    fn future_bucket(&self, ahead: i64) -> RelativeTimeBucket {
        if ahead < MINUTE {
            RelativeTimeBucket::JustNow
        } else if ahead < HOUR {
            RelativeTimeBucket::Minutes
        } else if ahead < DAY {
            RelativeTimeBucket::Hours
        } else if ahead < WEEK {
            RelativeTimeBucket::Days
        } else if self.extend_future_to_months && ahead >= MONTH {
            RelativeTimeBucket::Months
        } else {
            RelativeTimeBucket::Weeks
        }
    }
}

fn past_bucket(delta: i64) -> RelativeTimeBucket {
    if delta < MINUTE {
        RelativeTimeBucket::JustNow
    } else if delta < HOUR {
        RelativeTimeBucket::Minutes
    } else if delta < DAY {
        RelativeTimeBucket::Hours
    } else if delta < WEEK {
        RelativeTimeBucket::Days
    } else if delta < MONTH {
        RelativeTimeBucket::Weeks
    } else {
        RelativeTimeBucket::Months
    }
}

/// Format a timestamp string relative to `reference` with default options.
pub fn format_relative_time(target: &str, reference: DateTime<Utc>) -> Result<String> {
    RelativeTimeFormatter::default().format_str(target, reference)
}

/// Format an optional timestamp as relative time, or an em dash if missing.
pub fn format_relative_time_opt(
    target: Option<DateTime<Utc>>,
    reference: DateTime<Utc>,
) -> String {
    match target {
        Some(ts) => RelativeTimeFormatter::default().format(ts, reference),
        None => "—".to_string(),
    }
}

/// Format a cache lifetime in hours (`"12 hours"`, `"3 days"`).
pub fn format_cache_duration(hours: u32) -> String {
    if hours < 24 {
        format!("{} {}", hours, if hours == 1 { "hour" } else { "hours" })
    } else {
        let days = hours / 24;
        format!("{} {}", days, if days == 1 { "day" } else { "days" })
    }
}
