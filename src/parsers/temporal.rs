//! Temporal parsers: `datetime`, `date`, `time`, `timedelta`.
//!
//! Text sources use ISO-8601 forms. Date-times accept either `T` or a space
//! between date and time, an optional fraction, and an optional `Z` or
//! `±HH:MM` suffix which makes the result offset-aware.

use crate::coercion::CoercionFailure;
use crate::value::{Instant, TimeOfDay, TypedValue};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

const DATE_FORMAT: &str = "%Y-%m-%d";

const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

pub fn parse_datetime(value: &TypedValue) -> Result<TypedValue, CoercionFailure> {
    match value {
        TypedValue::DateTime(instant) => Ok(TypedValue::DateTime(*instant)),
        TypedValue::Str(s) => datetime_from_text(s.trim())
            .map(TypedValue::DateTime)
            .ok_or_else(|| {
                CoercionFailure::conversion(value, "datetime", "invalid ISO-8601 date-time")
            }),
        other => Err(CoercionFailure::conversion(
            value,
            "datetime",
            format!("expected a datetime or str source, got {}", other.kind()),
        )),
    }
}

fn datetime_from_text(text: &str) -> Option<Instant> {
    let mut normalized = text.to_string();
    if normalized.len() > 10 && normalized.as_bytes()[10] == b' ' {
        normalized.replace_range(10..11, "T");
    }
    if normalized.ends_with(['Z', 'z']) {
        normalized.pop();
        normalized.push_str("+00:00");
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(&normalized, format) {
            return Some(Instant::Offset(dt));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(Instant::Naive(dt));
        }
    }
    NaiveDate::parse_from_str(&normalized, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Instant::Naive)
}

pub fn parse_date(value: &TypedValue) -> Result<TypedValue, CoercionFailure> {
    match value {
        TypedValue::Date(date) => Ok(TypedValue::Date(*date)),
        TypedValue::Str(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(TypedValue::Date)
            .map_err(|e| {
                CoercionFailure::conversion(value, "date", format!("invalid ISO-8601 date: {e}"))
            }),
        other => Err(CoercionFailure::conversion(
            value,
            "date",
            format!("expected a str source, got {}", other.kind()),
        )),
    }
}

pub fn parse_time(value: &TypedValue) -> Result<TypedValue, CoercionFailure> {
    match value {
        TypedValue::Time(time) => Ok(TypedValue::Time(*time)),
        TypedValue::Int(hour) => u32::try_from(*hour)
            .ok()
            .and_then(TimeOfDay::from_hour)
            .map(TypedValue::Time)
            .ok_or_else(|| CoercionFailure::conversion(value, "time", "hour must be in 0..=23")),
        TypedValue::Str(s) => time_from_text(s.trim())
            .map(TypedValue::Time)
            .ok_or_else(|| {
                CoercionFailure::conversion(value, "time", "invalid ISO-8601 time of day")
            }),
        other => Err(CoercionFailure::conversion(
            value,
            "time",
            format!("expected an int or str source, got {}", other.kind()),
        )),
    }
}

fn time_from_text(text: &str) -> Option<TimeOfDay> {
    let (body, offset) = split_offset(text)?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(body, format).ok())?;
    Some(TimeOfDay { time, offset })
}

/// Split a trailing `Z` / `±HH:MM` / `±HHMM` suffix off a time of day.
///
/// Returns `None` when a suffix is present but malformed.
fn split_offset(text: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(body) = text.strip_suffix(['Z', 'z']) {
        return Some((body, FixedOffset::east_opt(0)));
    }
    let Some(at) = text.rfind(['+', '-']) else {
        return Some((text, None));
    };
    let (body, suffix) = text.split_at(at);
    let sign = if suffix.starts_with('-') { -1 } else { 1 };
    let digits = &suffix[1..];
    let (hours, minutes) = match digits.split_once(':') {
        Some(parts) => parts,
        None if digits.len() == 4 => digits.split_at(2),
        None => return None,
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;
    Some((body, Some(offset)))
}

pub fn parse_duration(value: &TypedValue) -> Result<TypedValue, CoercionFailure> {
    match value {
        TypedValue::Duration(delta) => Ok(TypedValue::Duration(*delta)),
        TypedValue::Int(days) => TimeDelta::try_days(*days)
            .map(TypedValue::Duration)
            .ok_or_else(|| CoercionFailure::conversion(value, "timedelta", "out of range")),
        other => Err(CoercionFailure::conversion(
            value,
            "timedelta",
            format!("expected a timedelta or int day count, got {}", other.kind()),
        )),
    }
}
