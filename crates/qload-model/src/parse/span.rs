use std::time::Duration;

use crate::DirectiveError;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Maximum number of fractional-second digits (100ns ticks).
const MAX_FRACTION_DIGITS: usize = 7;

/// Parse a `[d.]h:mm:ss[.fffffff]` time span.
///
/// Hours are limited to `0..=23`, minutes and seconds to `0..=59`; larger spans use the day prefix.
/// Surrounding ASCII whitespace is ignored.
pub fn parse_span(raw: &str) -> Result<Duration, DirectiveError> {
    let s = raw.trim();
    let invalid = || DirectiveError::InvalidDuration(s.to_string());

    let parts: Vec<&str> = s.split(':').collect();
    let [head, minutes, tail] = parts.as_slice() else {
        return Err(invalid());
    };

    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (number(days).ok_or_else(invalid)?, hours),
        None => (0, *head),
    };
    let (seconds, fraction) = match tail.split_once('.') {
        Some((seconds, fraction)) => (seconds, Some(fraction)),
        None => (*tail, None),
    };

    let hours = bounded(hours, 23).ok_or_else(invalid)?;
    let minutes = bounded(minutes, 59).ok_or_else(invalid)?;
    let seconds = bounded(seconds, 59).ok_or_else(invalid)?;
    let nanos = match fraction {
        Some(f) => fraction_nanos(f).ok_or_else(invalid)?,
        None => 0,
    };

    let secs = days
        .checked_mul(SECS_PER_DAY)
        .and_then(|d| d.checked_add(hours * SECS_PER_HOUR + minutes * SECS_PER_MINUTE + seconds))
        .ok_or_else(invalid)?;

    Ok(Duration::new(secs, nanos))
}

fn number(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn bounded(s: &str, max: u64) -> Option<u64> {
    number(s).filter(|v| *v <= max)
}

fn fraction_nanos(s: &str) -> Option<u32> {
    if s.len() > MAX_FRACTION_DIGITS {
        return None;
    }
    let digits = number(s)?;
    let scale = 10u64.pow((9 - s.len()) as u32);
    u32::try_from(digits * scale).ok()
}
