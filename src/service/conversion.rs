//! Turns extracted events into calendar payloads.
//!
//! The model returns wall-clock strings ("March 3, 2024 09:00:00"). They are read
//! in the caller's zone, encoded as UTC RFC 3339 with millisecond precision, and
//! sent together with the zone id so the provider renders them in local time.
//! Strings that already carry an offset are taken as absolute instants.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::models::event::{CalendarEventPayload, EventDateTime, ExtractedEvent};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%B %d, %Y", "%Y-%m-%d"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    #[error("event_Name is missing")]
    MissingName,
    #[error("{field} is missing")]
    MissingTimestamp { field: &'static str },
    #[error("{field} {value:?} is not a recognised date-time")]
    UnparseableTimestamp { field: &'static str, value: String },
    #[error("{field} {value:?} does not exist in time zone {time_zone}")]
    NonexistentLocalTime {
        field: &'static str,
        value: String,
        time_zone: String,
    },
    #[error("end_time {end} is before start_time {start}")]
    EndBeforeStart { start: String, end: String },
}

pub fn parse_timestamp(
    field: &'static str,
    raw: Option<&str>,
    time_zone: Tz,
) -> Result<DateTime<Utc>, EventValidationError> {
    let value = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(EventValidationError::MissingTimestamp { field })?;

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    let wall_clock = expand_sept(value);
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&wall_clock, format).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(&wall_clock, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| EventValidationError::UnparseableTimestamp {
            field,
            value: value.to_string(),
        })?;

    // Ambiguous local times (DST fall-back) resolve to the earlier instant.
    time_zone
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| EventValidationError::NonexistentLocalTime {
            field,
            value: value.to_string(),
            time_zone: time_zone.name().to_string(),
        })
}

/// chrono knows "Sep" and "September" but not "Sept" or "Sept.".
fn expand_sept(value: &str) -> Cow<'_, str> {
    match value.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("sept") => {
            let rest = &value[4..];
            if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Cow::Borrowed(value);
            }
            Cow::Owned(format!("Sep{}", rest.strip_prefix('.').unwrap_or(rest)))
        }
        _ => Cow::Borrowed(value),
    }
}

pub fn encode_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn to_calendar_payload(
    event: &ExtractedEvent,
    time_zone: Tz,
) -> Result<CalendarEventPayload, EventValidationError> {
    let summary = event
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or(EventValidationError::MissingName)?;
    let start = parse_timestamp("start_time", event.start_time.as_deref(), time_zone)?;
    let end = parse_timestamp("end_time", event.end_time.as_deref(), time_zone)?;
    if end < start {
        return Err(EventValidationError::EndBeforeStart {
            start: encode_timestamp(start),
            end: encode_timestamp(end),
        });
    }

    let zone = time_zone.name().to_string();
    Ok(CalendarEventPayload {
        summary: summary.to_string(),
        description: event.description.clone(),
        start: EventDateTime {
            date_time: encode_timestamp(start),
            time_zone: zone.clone(),
        },
        end: EventDateTime {
            date_time: encode_timestamp(end),
            time_zone: zone,
        },
    })
}
