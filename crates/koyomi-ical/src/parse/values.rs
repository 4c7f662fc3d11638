//! Leaf value decoders: text unescaping, the two date grammars, geo pairs,
//! category lists.
//!
//! None of these ever fail the parse: a value that misses its grammar falls
//! back to unescaped text.

use chrono::{NaiveDate, NaiveDateTime};

use super::content_line::ContentLine;
use crate::core::{DateStamp, GeoPoint, Value};

/// Unescapes text values (RFC 5545 §3.3.11).
///
/// Escape sequences: `\\` `\,` `\;` `\n` `\N`. Invalid escapes are preserved
/// as written.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n' | 'N') => result.push('\n'),
                Some(',') => result.push(','),
                Some(';') => result.push(';'),
                Some('\\') | None => result.push('\\'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Decodes a date or date-time value.
///
/// Two grammars: an 8-digit `yyyymmdd` local calendar date when a
/// `VALUE=DATE` parameter is present, otherwise `yyyymmddThhmmss` with an
/// optional trailing `Z` (UTC marker). A `TZID` parameter is attached as a
/// tag without converting the instant. When neither grammar matches, the
/// unescaped raw text is stored instead; unparseable dates never error.
#[must_use]
pub fn decode_date(raw: &str, line: &ContentLine) -> Value {
    let tzid = line.param_text("TZID").map(str::to_owned);

    if line.has_param_value("VALUE", "DATE")
        && let Some(date) = parse_ymd(raw)
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return Value::Date(DateStamp {
            naive,
            utc: false,
            tzid,
            date_only: true,
        });
    }

    if let Some((naive, utc)) = parse_datetime(raw) {
        return Value::Date(DateStamp {
            naive,
            utc,
            tzid,
            date_only: false,
        });
    }

    tracing::trace!(property = %line.name, value = raw, "date failed its grammar, storing as text");
    Value::text(unescape_text(raw))
}

/// Parses an 8-digit `yyyymmdd` calendar date.
pub(crate) fn parse_ymd(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(
        s[0..4].parse().ok()?,
        s[4..6].parse().ok()?,
        s[6..8].parse().ok()?,
    )
}

/// Parses `yyyymmddThhmmss` with an optional trailing `Z`.
fn parse_datetime(s: &str) -> Option<(NaiveDateTime, bool)> {
    let (body, utc) = match s.strip_suffix('Z') {
        Some(stripped) => (stripped, true),
        None => (s, false),
    };

    // Digit check before slicing: byte 8 of a multibyte value need not be a
    // char boundary.
    if body.len() != 15 || !body.as_bytes()[..8].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let (date_str, rest) = body.split_at(8);
    let time_str = rest.strip_prefix('T')?;
    if !time_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let date = parse_ymd(date_str)?;
    let naive = date.and_hms_opt(
        time_str[0..2].parse().ok()?,
        time_str[2..4].parse().ok()?,
        time_str[4..6].parse().ok()?,
    )?;
    Some((naive, utc))
}

/// Parses a `GEO` value of the form `lat;lon` into a numeric pair.
#[must_use]
pub fn decode_geo(raw: &str) -> Option<GeoPoint> {
    let (lat, lon) = raw.split_once(';')?;
    Some(GeoPoint {
        lat: lat.trim().parse().ok()?,
        lon: lon.trim().parse().ok()?,
    })
}

/// Splits a `CATEGORIES` value on commas, trimming each entry.
#[must_use]
pub fn split_categories(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}
