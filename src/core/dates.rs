// src/core/dates.rs

//! Date handling for registration records.
//!
//! WHOIS servers disagree on date layouts and sometimes report several
//! candidates for one field. Collectors turn what they can into
//! `NaiveDateTime` at the boundary; this module turns the result into plain
//! ISO-8601 strings for the report and parses those strings back for the
//! expiration heuristic.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::core::models::{DateField, RawDate, RawTimestamp, RegistrationInfo, RegistrationRecord};

/// Layouts seen in WHOIS output, tried in order after RFC 3339.
const WHOIS_DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%d-%b-%Y %H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const WHOIS_DAY_LAYOUTS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%Y.%m.%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Formats a timestamp the way the report stores it: `YYYY-MM-DDTHH:MM:SS`,
/// with six fractional digits only when the sub-second part is non-zero.
pub fn to_iso8601(timestamp: &NaiveDateTime) -> String {
    if timestamp.nanosecond() == 0 {
        timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Parses an ISO-8601 string as produced by `to_iso8601`, or an RFC 3339
/// value with an offset (converted to UTC), or a bare date at midnight.
pub fn parse_iso8601(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Best-effort parse of a raw WHOIS date value. Values that match no known
/// layout are kept as text.
pub fn parse_whois_timestamp(value: &str) -> RawTimestamp {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return RawTimestamp::Parsed(dt.naive_utc());
    }
    let parsed = WHOIS_DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
        .or_else(|| {
            WHOIS_DAY_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(value, layout).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });
    match parsed {
        Some(dt) => RawTimestamp::Parsed(dt),
        None => RawTimestamp::Text(value.to_string()),
    }
}

fn normalize_timestamp(timestamp: &RawTimestamp) -> String {
    match timestamp {
        RawTimestamp::Parsed(dt) => to_iso8601(dt),
        RawTimestamp::Text(text) => text.clone(),
    }
}

/// Converts a raw date field into strings, keeping the shape, order and length.
pub fn normalize_date(raw: &RawDate) -> DateField {
    match raw {
        RawDate::Single(ts) => DateField::Single(normalize_timestamp(ts)),
        RawDate::Multiple(values) => {
            DateField::Multiple(values.iter().map(normalize_timestamp).collect())
        }
    }
}

pub fn normalize_registration(record: RegistrationRecord) -> RegistrationInfo {
    RegistrationInfo {
        registrar: record.registrar,
        creation_date: record.creation_date.as_ref().map(normalize_date),
        expiration_date: record.expiration_date.as_ref().map(normalize_date),
    }
}
