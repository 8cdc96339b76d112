// src/dates.rs

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// Parses a commit date as written by `git log --date=iso`.
///
/// The log writes `2024-01-10 12:34:56 +0900`; the date/time separator is
/// rewritten to `T` and the space before the offset is dropped. Timestamps
/// without an offset are taken as UTC.
pub fn parse_commit_date(value: &str) -> Result<DateTime<FixedOffset>> {
    let normalized = normalize(value);

    if let Ok(date) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(date);
    }
    if let Ok(date) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(date);
    }

    match NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Ok(naive.and_utc().fixed_offset()),
        Err(source) => match NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
            Ok(day) => Ok(day.and_time(NaiveTime::MIN).and_utc().fixed_offset()),
            Err(_) => Err(Error::InvalidDate { value: value.to_string(), source }),
        },
    }
}

fn normalize(value: &str) -> String {
    let mut parts = value.split_whitespace();
    let Some(date) = parts.next() else {
        return String::new();
    };
    match parts.next() {
        Some(time) => {
            let offset: String = parts.collect();
            format!("{date}T{time}{offset}")
        }
        None => date.to_string(),
    }
}
