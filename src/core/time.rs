// src/core/time.rs
//
// Raw battle times come in three shapes: epoch numbers (seconds or millis),
// calendar strings ("2024-03-01 18:22:05 UTC") and relative durations ("3h 5m ago").
// Everything resolves to epoch milliseconds.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Numbers with fewer integer digits than this are epoch seconds.
pub const MILLIS_DIGIT_THRESHOLD: usize = 12;

static TRAILING_UTC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*(UTC|GMT|Z)\s*$").expect("regex"));
static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("regex"));
static RELATIVE_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(d|days?|h|hrs?|hours?|m|mins?|minutes?|s|secs?|seconds?)\b").expect("regex"));
static RELATIVE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+\s*[a-z]+\s*)+(ago)?$").expect("regex")
});

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeSource {
    Numeric,
    Absolute,
    Relative,
    /// Nothing usable; `now` was substituted.
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedTime {
    pub millis: i64,
    pub source: TimeSource,
}

impl ResolvedTime {
    /// Local wall-clock rendering, only for times that came from the page itself.
    pub fn local_display(&self) -> Option<String> {
        match self.source {
            TimeSource::Numeric | TimeSource::Absolute => Local
                .timestamp_millis_opt(self.millis)
                .single()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            TimeSource::Relative | TimeSource::Fallback => None,
        }
    }
}

/// Resolve a raw time value to epoch millis; `now_ms` fills in when nothing parses.
pub fn resolve(raw: &str, now_ms: i64) -> ResolvedTime {
    let cleaned = TRAILING_UTC.replace(raw.trim(), "").trim().to_string();
    if cleaned.is_empty() {
        return ResolvedTime { millis: now_ms, source: TimeSource::Fallback };
    }
    if let Some(ms) = parse_numeric(&cleaned) {
        return ResolvedTime { millis: ms, source: TimeSource::Numeric };
    }
    if let Some(ms) = parse_calendar(&cleaned) {
        return ResolvedTime { millis: ms, source: TimeSource::Absolute };
    }
    if let Some(ago) = parse_relative(&cleaned) {
        return ResolvedTime { millis: now_ms.saturating_sub(ago), source: TimeSource::Relative };
    }
    ResolvedTime { millis: now_ms, source: TimeSource::Fallback }
}

/// `1700000000` → `1700000000000`; 12+ integer digits are already millis.
pub fn parse_numeric(s: &str) -> Option<i64> {
    if !NUMERIC.is_match(s) {
        return None;
    }
    let int_digits = s.split('.').next().unwrap_or("").len();
    let num: f64 = s.parse().ok()?;
    if int_digits < MILLIS_DIGIT_THRESHOLD {
        Some((num * 1000.0).floor() as i64)
    } else {
        Some(num.floor() as i64)
    }
}

/// Calendar strings; no explicit offset means UTC.
pub fn parse_calendar(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt).timestamp_millis());
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?).timestamp_millis())
}

/// `"2h 5m ago"` → milliseconds elapsed. `None` when the sum does not fit.
pub fn parse_relative(s: &str) -> Option<i64> {
    if !RELATIVE_SHAPE.is_match(s.trim()) {
        return None;
    }
    let mut total: i64 = 0;
    let mut matched = false;
    for cap in RELATIVE_PART.captures_iter(s) {
        let n: i64 = cap[1].parse().ok()?;
        let unit = cap[2].to_ascii_lowercase();
        let ms = match unit.chars().next()? {
            'd' => 86_400_000,
            'h' => 3_600_000,
            'm' => 60_000,
            _ => 1_000,
        };
        total = total.checked_add(n.checked_mul(ms)?)?;
        matched = true;
    }
    matched.then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_800_000_000_000;

    #[test]
    fn seconds_become_millis() {
        assert_eq!(resolve("1700000000", NOW).millis, 1_700_000_000_000);
        assert_eq!(resolve("1700000000000", NOW).millis, 1_700_000_000_000);
        assert_eq!(resolve("1700000000.5", NOW).millis, 1_700_000_000_500);
        assert_eq!(resolve("1700000000", NOW).source, TimeSource::Numeric);
    }

    #[test]
    fn utc_calendar_strings() {
        let r = resolve("2023-11-14 22:13:20 UTC", NOW);
        assert_eq!(r.source, TimeSource::Absolute);
        assert_eq!(r.millis, 1_700_000_000_000);
        assert_eq!(resolve("2023-11-14T22:13:20Z", NOW).millis, 1_700_000_000_000);
        assert_eq!(resolve("2023-11-14T22:13:20+00:00", NOW).millis, 1_700_000_000_000);
        assert!(r.local_display().is_some());
    }

    #[test]
    fn relative_durations_subtract_from_now() {
        let r = resolve("2h 5m ago", NOW);
        assert_eq!(r.source, TimeSource::Relative);
        assert_eq!(r.millis, NOW - (2 * 3_600_000 + 5 * 60_000));
        assert_eq!(resolve("1d", NOW).millis, NOW - 86_400_000);
        assert!(r.local_display().is_none());
    }

    #[test]
    fn oversized_durations_fall_back_instead_of_overflowing() {
        assert_eq!(parse_relative("99999999999999 d"), None);
        assert_eq!(parse_relative("9223372036854775807 s"), None);
        let r = resolve("99999999999999 d ago", NOW);
        assert_eq!(r, ResolvedTime { millis: NOW, source: TimeSource::Fallback });
        // fits in i64 but reaches past the epoch floor
        let far = resolve("100000000 d", i64::MIN + 1);
        assert_eq!(far.millis, i64::MIN);
    }

    #[test]
    fn junk_falls_back_to_now() {
        let r = resolve("sometime last week-ish", NOW);
        assert_eq!(r, ResolvedTime { millis: NOW, source: TimeSource::Fallback });
        assert_eq!(resolve("   ", NOW).source, TimeSource::Fallback);
    }
}
