//! Value type registry: maps property names to typed decoders.
//!
//! Dispatch is a closed enumeration over the uppercased property name,
//! matched exhaustively. Unknown names are never rejected: extension (`X-`)
//! properties store under their stripped name while inside a component,
//! everything else under its lowercase form, both with text storage.

use std::collections::BTreeMap;

use super::content_line::ContentLine;
use super::values::{decode_date, decode_geo, parse_ymd, split_categories, unescape_text};
use crate::core::{CalendarComponent, DateStamp, FreeBusyEntry, Scalar, Value, keys};

/// Resolved decoder for a property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Summary,
    Description,
    Url,
    Uid,
    Location,
    Class,
    Transparency,
    Completion,
    Start,
    End,
    Completed,
    Dtstamp,
    Created,
    LastModified,
    RecurrenceId,
    Geo,
    Categories,
    ExceptionDates,
    FreeBusy,
    Rule,
    /// `X-` extension property, stored under the stripped name.
    Extension(String),
    /// Any other name, stored lowercased.
    Other(String),
}

impl PropertyKind {
    /// Resolves a property name to its decoder.
    ///
    /// `X-` stripping only applies while inside a component; a stray
    /// extension property at top level falls through to lowercase storage.
    #[must_use]
    pub fn resolve(name: &str, in_component: bool) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "SUMMARY" => Self::Summary,
            "DESCRIPTION" => Self::Description,
            "URL" => Self::Url,
            "UID" => Self::Uid,
            "LOCATION" => Self::Location,
            "CLASS" => Self::Class,
            "TRANSP" => Self::Transparency,
            "PERCENT-COMPLETE" => Self::Completion,
            "DTSTART" => Self::Start,
            "DTEND" => Self::End,
            "COMPLETED" => Self::Completed,
            "DTSTAMP" => Self::Dtstamp,
            "CREATED" => Self::Created,
            "LAST-MODIFIED" => Self::LastModified,
            "RECURRENCE-ID" => Self::RecurrenceId,
            "GEO" => Self::Geo,
            "CATEGORIES" => Self::Categories,
            "EXDATE" => Self::ExceptionDates,
            "FREEBUSY" => Self::FreeBusy,
            "RRULE" => Self::Rule,
            _ => {
                if in_component && name.len() > 2 && name.starts_with("X-") {
                    Self::Extension(name[2..].to_string())
                } else {
                    Self::Other(name.to_ascii_lowercase())
                }
            }
        }
    }

    /// The key this property stores under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        match self {
            Self::Summary => keys::SUMMARY,
            Self::Description => keys::DESCRIPTION,
            Self::Url => keys::URL,
            Self::Uid => keys::UID,
            Self::Location => keys::LOCATION,
            Self::Class => keys::CLASS,
            Self::Transparency => keys::TRANSPARENCY,
            Self::Completion => keys::COMPLETION,
            Self::Start => keys::START,
            Self::End => keys::END,
            Self::Completed => keys::COMPLETED,
            Self::Dtstamp => keys::DTSTAMP,
            Self::Created => keys::CREATED,
            Self::LastModified => keys::LAST_MODIFIED,
            Self::RecurrenceId => keys::RECURRENCE_ID,
            Self::Geo => keys::GEO,
            Self::Categories => keys::CATEGORIES,
            Self::ExceptionDates => keys::EXDATE,
            Self::FreeBusy => keys::FREEBUSY,
            Self::Rule => keys::RRULE,
            Self::Extension(name) | Self::Other(name) => name,
        }
    }
}

/// Decodes one content line into the active component.
///
/// `raw_line` is the full logical line; the rule decoder captures it
/// verbatim for later normalization.
pub fn apply(
    line: &ContentLine,
    raw_line: &str,
    in_component: bool,
    component: &mut CalendarComponent,
) {
    let kind = PropertyKind::resolve(&line.name, in_component);
    let key = kind.storage_key().to_string();

    match kind {
        PropertyKind::Summary
        | PropertyKind::Description
        | PropertyKind::Url
        | PropertyKind::Uid
        | PropertyKind::Location
        | PropertyKind::Class
        | PropertyKind::Transparency
        | PropertyKind::Completion
        | PropertyKind::Extension(_)
        | PropertyKind::Other(_) => store_text(component, &key, line),

        PropertyKind::Start
        | PropertyKind::End
        | PropertyKind::Completed
        | PropertyKind::Dtstamp
        | PropertyKind::Created
        | PropertyKind::LastModified
        | PropertyKind::RecurrenceId => {
            // RECURRENCE-ID decodes like any date; THISANDFUTURE/THISANDPRIOR
            // range qualifiers are not interpreted.
            component.store(&key, decode_date(&line.raw_value, line));
        }

        PropertyKind::Geo => match decode_geo(&line.raw_value) {
            Some(point) => {
                component.properties.insert(key, Value::Geo(point));
            }
            None => {
                tracing::debug!(value = %line.raw_value, "GEO value is not a lat;lon pair");
                store_text(component, &key, line);
            }
        },

        PropertyKind::Categories => store_categories(component, &key, line),
        PropertyKind::ExceptionDates => store_exception_dates(component, &key, line),
        PropertyKind::FreeBusy => store_freebusy(component, &key, line),

        PropertyKind::Rule => {
            // Verbatim line, swapped for a compiled rule on component close.
            component
                .properties
                .insert(key, Value::RawRule(raw_line.to_string()));
        }
    }
}

/// Text storage: bare scalar without meaningful parameters, parameterized
/// value otherwise. Repeats promote to a list.
fn store_text(component: &mut CalendarComponent, key: &str, line: &ContentLine) {
    let text = unescape_text(&line.raw_value);
    let value = if line.has_params() {
        Value::WithParams {
            params: line.params.clone(),
            value: Scalar::Text(text),
        }
    } else {
        Value::text(text)
    };
    component.store(key, value);
}

/// Category lists union across occurrences, preserving per-occurrence order.
/// No de-duplication.
fn store_categories(component: &mut CalendarComponent, key: &str, line: &ContentLine) {
    let entries = split_categories(&line.raw_value);
    match component.properties.get_mut(key) {
        Some(Value::Categories(list)) => list.extend(entries),
        _ => {
            component
                .properties
                .insert(key.to_string(), Value::Categories(entries));
        }
    }
}

/// EXDATE: each comma-separated token decodes via the date decoder and is
/// indexed by its date-only key. A later token with the same key wins. The
/// time of day is deliberately excluded from the key: floating times are
/// ambiguous, and producers routinely emit exception times that do not match
/// the base rule.
fn store_exception_dates(component: &mut CalendarComponent, key: &str, line: &ContentLine) {
    if !matches!(
        component.properties.get(key),
        Some(Value::ExceptionDates(_))
    ) {
        component
            .properties
            .insert(key.to_string(), Value::ExceptionDates(BTreeMap::new()));
    }
    let Some(Value::ExceptionDates(map)) = component.properties.get_mut(key) else {
        return;
    };

    if line.raw_value.is_empty() {
        return;
    }
    for token in line.raw_value.split(',') {
        let token = token.trim();
        match exception_stamp(token, line) {
            Some(stamp) => {
                map.insert(stamp.date_key(), stamp);
            }
            None => {
                tracing::error!(token, "exception date is not a date, skipping");
            }
        }
    }
}

/// Decodes one EXDATE token. Bare 8-digit tokens count as date-only even
/// without a `VALUE=DATE` parameter; producers emit both forms.
fn exception_stamp(token: &str, line: &ContentLine) -> Option<DateStamp> {
    if let Value::Date(stamp) = decode_date(token, line) {
        return Some(stamp);
    }
    let naive = parse_ymd(token)?.and_hms_opt(0, 0, 0)?;
    Some(DateStamp {
        naive,
        utc: false,
        tzid: line.param_text("TZID").map(str::to_owned),
        date_only: true,
    })
}

/// FREEBUSY: `start/end` decoded via the date decoder, `FBTYPE` defaulting
/// to `BUSY`. Multiple lines accumulate entries.
fn store_freebusy(component: &mut CalendarComponent, key: &str, line: &ContentLine) {
    let fbtype = line.param_text("FBTYPE").unwrap_or("BUSY").to_string();
    let (start_raw, end_raw) = line
        .raw_value
        .split_once('/')
        .unwrap_or((line.raw_value.as_str(), ""));

    let entry = FreeBusyEntry {
        fbtype,
        start: decode_date(start_raw, line),
        end: decode_date(end_raw, line),
    };

    match component.properties.get_mut(key) {
        Some(Value::FreeBusy(list)) => list.push(entry),
        _ => {
            component
                .properties
                .insert(key.to_string(), Value::FreeBusy(vec![entry]));
        }
    }
}
