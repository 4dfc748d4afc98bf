//! Clock-time parsing and minute arithmetic.
//!
//! All schedule math works on plain minute counts since local midnight.
//! Parsing is deliberately shape-only: `25:90` parses to 25h 90m and the
//! arithmetic downstream carries it as 1590 minutes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minutes in a civil day.
pub const MINUTES_PER_DAY: i64 = 1440;

/// An hour/minute pair as written by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Minutes since midnight, without wrapping.
    pub fn to_minutes(self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parse `HHMM`, `H:MM`, `HH:MM` or the dotted variants (`22.10`).
///
/// Only the first dot is read as a separator. No range check is made on
/// either field.
pub fn parse_time(text: &str) -> Option<ClockTime> {
    let normalized = text.trim().replacen('.', ":", 1);

    if normalized.len() == 4 && is_ascii_digits(&normalized) {
        let hour = normalized[..2].parse().ok()?;
        let minute = normalized[2..].parse().ok()?;
        return Some(ClockTime::new(hour, minute));
    }

    let (hour, minute) = normalized.split_once(':')?;
    if !(1..=2).contains(&hour.len()) || minute.len() != 2 {
        return None;
    }
    if !is_ascii_digits(hour) || !is_ascii_digits(minute) {
        return None;
    }
    Some(ClockTime::new(hour.parse().ok()?, minute.parse().ok()?))
}

/// Shorthand for `ClockTime::to_minutes`.
pub fn to_minutes(time: ClockTime) -> i64 {
    time.to_minutes()
}

/// Render a minute count as zero-padded `HH:MM`.
///
/// Values past a day are not wrapped (`1500` renders as `25:00`).
pub fn format_hhmm(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.abs();
    format!("{sign}{:02}:{:02}", abs / 60, abs % 60)
}

/// Parse a duration-like token into minutes.
///
/// Accepts `HH:MM` / `HH.MM`, a bare hour count (`8`), or the compound
/// `<N>h[<M>m]` notation (`10h`, `10h30m`, `10h 30m`).
pub fn parse_duration(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some((hours, minutes)) = text.split_once([':', '.']) {
        if (1..=2).contains(&hours.len())
            && minutes.len() == 2
            && is_ascii_digits(hours)
            && is_ascii_digits(minutes)
        {
            return parse_time(text).map(ClockTime::to_minutes);
        }
        return None;
    }

    if text.len() <= 2 && is_ascii_digits(text) {
        return text.parse::<i64>().ok().map(|h| h * 60);
    }

    let lower = text.to_ascii_lowercase();
    let (hours, rest) = lower.split_once('h')?;
    if !(1..=2).contains(&hours.len()) || !is_ascii_digits(hours) {
        return None;
    }
    let hours: i64 = hours.parse().ok()?;

    let rest = rest.trim_start();
    if rest.is_empty() {
        return Some(hours * 60);
    }
    let minutes = rest.strip_suffix('m')?;
    if !(1..=2).contains(&minutes.len()) || !is_ascii_digits(minutes) {
        return None;
    }
    Some(hours * 60 + minutes.parse::<i64>().ok()?)
}

/// Length of the intersection of `[start, end)` with `[lower, upper)`.
pub fn interval_overlap(start: i64, end: i64, lower: i64, upper: i64) -> i64 {
    (end.min(upper) - start.max(lower)).max(0)
}

/// Overlap of `[0, value]` against `[lower, upper)`, floored at zero.
pub fn overlap_minutes(value: i64, lower: i64, upper: i64) -> i64 {
    interval_overlap(0, value, lower, upper)
}

fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
