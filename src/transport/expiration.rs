//! Freshness metadata from HTTP response headers.
//!
//! `Cache-Control: max-age` wins over `Expires`, as in HTTP caching rules.
//! Anything unparseable means "no expiration known"; it is never an error.

use std::time::{Duration, SystemTime};

use chrono::{DateTime, NaiveDateTime, Utc};
use http::header::{CACHE_CONTROL, EXPIRES};
use http::HeaderMap;

/// Fallback formats for obsolete HTTP dates (RFC 850 and asctime).
const OBSOLETE_DATE_FORMATS: [&str; 2] = ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];

/// Expiration of a response received at `now`.
pub fn expiration_from_headers(headers: &HeaderMap, now: SystemTime) -> Option<SystemTime> {
    let max_age = headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(parse_max_age);

    if let Some(seconds) = max_age {
        return now.checked_add(Duration::from_secs(seconds));
    }

    headers
        .get(EXPIRES)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_http_date)
}

/// Extract `max-age=N` from a `Cache-Control` value.
pub fn parse_max_age(value: &str) -> Option<u64> {
    value.split(',').find_map(|directive| {
        let (name, arg) = directive.trim().split_once('=')?;
        if name.trim().eq_ignore_ascii_case("max-age") {
            arg.trim().trim_matches('"').parse().ok()
        } else {
            None
        }
    })
}

/// Parse an HTTP date (IMF-fixdate, RFC 850 or asctime).
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc).into());
    }

    OBSOLETE_DATE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|naive| naive.and_utc().into())
    })
}
