//! Decoded property values.
//!
//! Every value a decoder can produce is a [`Value`] variant. The decoder is
//! tolerant by contract: anything that fails its grammar falls back to a
//! textual scalar instead of an error, so consumers pattern-match rather
//! than unwrap.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::recur::CompiledRule;

/// A coerced scalar, as produced for parameter values and plain properties.
///
/// Mirrors the coercion applied to `KEY=VALUE` parameters: `TRUE`/`FALSE`
/// become booleans, numeric-looking strings become numbers, everything else
/// stays text.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Plain text.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

impl Scalar {
    /// Coerces a raw string: `"TRUE"`/`"FALSE"` to booleans, numeric-looking
    /// strings to numbers, anything else left as text.
    ///
    /// Empty and whitespace-only strings stay text.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "TRUE" => Self::Boolean(true),
            "FALSE" => Self::Boolean(false),
            other => match other.trim().parse::<f64>() {
                Ok(n) if !other.trim().is_empty() => Self::Number(n),
                _ => Self::Text(other.to_string()),
            },
        }
    }

    /// Returns the text content if this scalar is textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) | Self::Boolean(_) => None,
        }
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A single property parameter: key plus coerced scalar value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name, as written.
    pub name: String,
    /// Coerced value.
    pub value: Scalar,
}

impl Parameter {
    /// Creates a parameter, coercing the raw value.
    #[must_use]
    pub fn new(name: impl Into<String>, raw_value: &str) -> Self {
        Self {
            name: name.into(),
            value: Scalar::coerce(raw_value),
        }
    }
}

/// A decoded date or date-time.
///
/// The civil fields are carried exactly as written. A trailing `Z` sets the
/// UTC flag; a `TZID` parameter is attached as a tag without converting the
/// instant. Both markers can be present at once.
#[derive(Debug, Clone, PartialEq)]
pub struct DateStamp {
    /// Civil date-time fields as written (midnight for date-only values).
    pub naive: NaiveDateTime,
    /// Whether the value carried a trailing `Z`.
    pub utc: bool,
    /// Attached `TZID` parameter, carried without conversion.
    pub tzid: Option<String>,
    /// Whether this was an 8-digit `VALUE=DATE` value with no time component.
    pub date_only: bool,
}

impl DateStamp {
    /// The `yyyy-mm-dd` key used for exception-date and recurrence tables.
    ///
    /// The time of day is deliberately ignored: floating times are ambiguous
    /// and real-world producers emit override times that do not match their
    /// base rule.
    #[must_use]
    pub fn date_key(&self) -> String {
        self.naive.format("%Y-%m-%d").to_string()
    }

    /// Compact timestamp with punctuation and fractional seconds removed,
    /// e.g. `20200101T090000Z`. Used when synthesizing a `DTSTART` clause.
    #[must_use]
    pub fn compact(&self) -> String {
        let mut s = self.naive.format("%Y%m%dT%H%M%S").to_string();
        if self.utc {
            s.push('Z');
        }
        s
    }

    /// The UTC instant, when the value carried the UTC marker.
    #[must_use]
    pub fn utc_instant(&self) -> Option<DateTime<Utc>> {
        self.utc.then(|| self.naive.and_utc())
    }
}

/// Geographic position from a `GEO` property.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One `FREEBUSY` interval.
///
/// `start`/`end` are decoded with the date decoder and may individually fall
/// back to text when their grammar fails.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeBusyEntry {
    /// `FBTYPE` parameter, defaulting to `BUSY`.
    pub fbtype: String,
    /// Interval start.
    pub start: Value,
    /// Interval end.
    pub end: Value,
}

/// A decoded property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain scalar (the common case for text properties).
    Scalar(Scalar),
    /// Scalar carrying meaningful parameters.
    WithParams {
        /// Parameters in order of appearance.
        params: Vec<Parameter>,
        /// Unescaped text value.
        value: Scalar,
    },
    /// Decoded date or date-time.
    Date(DateStamp),
    /// `GEO` coordinate pair.
    Geo(GeoPoint),
    /// Accumulated `FREEBUSY` intervals.
    FreeBusy(Vec<FreeBusyEntry>),
    /// `EXDATE` entries keyed by `yyyy-mm-dd`.
    ExceptionDates(BTreeMap<String, DateStamp>),
    /// `CATEGORIES` union list, per-occurrence order preserved.
    Categories(Vec<String>),
    /// Verbatim `RRULE` line, captured before normalization.
    RawRule(String),
    /// Recurrence rule compiled by the external evaluator.
    CompiledRule(Box<CompiledRule>),
    /// Repeated occurrences of a property without an aggregate structure.
    List(Vec<Value>),
}

impl Value {
    /// Creates a plain text value.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Text(s.into()))
    }

    /// Returns the text content of a bare or parameterized scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) | Self::WithParams { value: s, .. } => s.as_text(),
            _ => None,
        }
    }

    /// Returns the date stamp if this value decoded as a date.
    #[must_use]
    pub fn as_date(&self) -> Option<&DateStamp> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the exception-date table if present.
    #[must_use]
    pub fn as_exception_dates(&self) -> Option<&BTreeMap<String, DateStamp>> {
        match self {
            Self::ExceptionDates(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the category list if present.
    #[must_use]
    pub fn as_categories(&self) -> Option<&[String]> {
        match self {
            Self::Categories(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the compiled recurrence rule if normalization succeeded.
    #[must_use]
    pub fn as_compiled_rule(&self) -> Option<&CompiledRule> {
        match self {
            Self::CompiledRule(rule) => Some(rule),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, utc: bool) -> DateStamp {
        DateStamp {
            naive: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, s)
                .unwrap(),
            utc,
            tzid: None,
            date_only: false,
        }
    }

    #[test]
    fn scalar_coerce() {
        assert_eq!(Scalar::coerce("TRUE"), Scalar::Boolean(true));
        assert_eq!(Scalar::coerce("FALSE"), Scalar::Boolean(false));
        assert_eq!(Scalar::coerce("42"), Scalar::Number(42.0));
        assert_eq!(Scalar::coerce("-1.5"), Scalar::Number(-1.5));
        assert_eq!(Scalar::coerce("utf-8"), Scalar::Text("utf-8".to_string()));
        // Empty strings stay text, unlike JS Number("") == 0.
        assert_eq!(Scalar::coerce(""), Scalar::Text(String::new()));
    }

    #[test]
    fn date_key_ignores_time() {
        let a = stamp(2020, 1, 1, 9, 0, 0, true);
        let b = stamp(2020, 1, 1, 23, 59, 59, false);
        assert_eq!(a.date_key(), "2020-01-01");
        assert_eq!(a.date_key(), b.date_key());
    }

    #[test]
    fn compact_keeps_utc_marker() {
        assert_eq!(stamp(2020, 1, 1, 9, 0, 0, true).compact(), "20200101T090000Z");
        assert_eq!(stamp(2020, 1, 1, 9, 0, 0, false).compact(), "20200101T090000");
    }

    #[test]
    fn utc_instant_only_for_utc() {
        let utc = stamp(2020, 1, 1, 9, 0, 0, true);
        assert!(utc.utc_instant().is_some());
        assert!(stamp(2020, 1, 1, 9, 0, 0, false).utc_instant().is_none());
    }
}
