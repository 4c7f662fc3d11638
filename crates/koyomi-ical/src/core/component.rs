//! Calendar components and the finished document.

use std::collections::BTreeMap;

use super::value::{DateStamp, Value};

/// Component kind, from the `BEGIN`/`END` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
    /// VTODO component.
    Todo,
    /// VJOURNAL component.
    Journal,
    /// VFREEBUSY component.
    FreeBusy,
    /// VTIMEZONE component.
    Timezone,
    /// VALARM component (nested within VEVENT/VTODO).
    Alarm,
    /// Anything else, including X-components.
    Other,
}

impl ComponentKind {
    /// Parses a component kind from a marker value (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "VCALENDAR" => Self::Calendar,
            "VEVENT" => Self::Event,
            "VTODO" => Self::Todo,
            "VJOURNAL" => Self::Journal,
            "VFREEBUSY" => Self::FreeBusy,
            "VTIMEZONE" => Self::Timezone,
            "VALARM" => Self::Alarm,
            _ => Self::Other,
        }
    }

    /// Whether this is a schedulable component (VEVENT, VTODO, VJOURNAL).
    ///
    /// Recurrence rules are only normalized for these kinds.
    #[must_use]
    pub const fn is_schedulable(self) -> bool {
        matches!(self, Self::Event | Self::Todo | Self::Journal)
    }
}

/// Storage keys for decoded properties.
///
/// Registered property names map onto these fixed keys; extension (`X-`)
/// properties store under their stripped name and everything else under its
/// lowercase form.
pub mod keys {
    pub const SUMMARY: &str = "summary";
    pub const DESCRIPTION: &str = "description";
    pub const URL: &str = "url";
    pub const UID: &str = "uid";
    pub const LOCATION: &str = "location";
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const EXDATE: &str = "exdate";
    pub const CLASS: &str = "class";
    pub const TRANSPARENCY: &str = "transparency";
    pub const GEO: &str = "geo";
    pub const COMPLETION: &str = "completion";
    pub const COMPLETED: &str = "completed";
    pub const CATEGORIES: &str = "categories";
    pub const FREEBUSY: &str = "freebusy";
    pub const DTSTAMP: &str = "dtstamp";
    pub const CREATED: &str = "created";
    pub const LAST_MODIFIED: &str = "lastmodified";
    pub const RECURRENCE_ID: &str = "recurrenceid";
    pub const RRULE: &str = "rrule";
}

/// An in-progress or finished calendar component.
///
/// Child components close into their parent's `components` map keyed by UID
/// (or a generated key); recurrence overrides live only in their parent's
/// `recurrences` table, keyed by `yyyy-mm-dd`.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarComponent {
    /// Component kind.
    pub kind: ComponentKind,
    /// Marker value as written, uppercased (preserves X-component names).
    pub name: String,
    /// Decoded properties by storage key.
    pub properties: BTreeMap<String, Value>,
    /// Closed children keyed by UID or generated key.
    pub components: BTreeMap<String, CalendarComponent>,
    /// Recurrence overrides keyed by date-only key; created lazily.
    pub recurrences: Option<BTreeMap<String, CalendarComponent>>,
}

impl CalendarComponent {
    /// Creates an empty component for a `BEGIN` marker value.
    #[must_use]
    pub fn new(marker: &str) -> Self {
        let name = marker.to_ascii_uppercase();
        Self {
            kind: ComponentKind::parse(&name),
            name,
            properties: BTreeMap::new(),
            components: BTreeMap::new(),
            recurrences: None,
        }
    }

    /// Returns the decoded value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Returns the UID, if one was stored as bare or parameterized text.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.properties.get(keys::UID)?.as_text()
    }

    /// Whether a RECURRENCE-ID property was stored, whatever its shape.
    #[must_use]
    pub fn has_recurrence_id(&self) -> bool {
        self.properties.contains_key(keys::RECURRENCE_ID)
    }

    /// The date-only key of the RECURRENCE-ID, when it decoded as a date.
    #[must_use]
    pub fn recurrence_key(&self) -> Option<String> {
        self.properties
            .get(keys::RECURRENCE_ID)?
            .as_date()
            .map(DateStamp::date_key)
    }

    /// Stores a value, promoting repeats into an ordered list.
    ///
    /// The first repeat converts the stored scalar into a two-element list;
    /// further repeats append.
    pub fn store(&mut self, key: &str, value: Value) {
        match self.properties.get_mut(key) {
            Some(Value::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, Value::List(Vec::new()));
                *existing = Value::List(vec![first, value]);
            }
            None => {
                self.properties.insert(key.to_string(), value);
            }
        }
    }
}

/// The finished parse result: identifier → component.
///
/// Each non-override component is reachable by exactly one key, its UID or a
/// generated fallback. Built once per parse call and not mutated afterward.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarDocument {
    /// Components keyed by UID or generated key.
    pub entries: BTreeMap<String, CalendarComponent>,
}

impl CalendarDocument {
    /// Returns the component stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CalendarComponent> {
        self.entries.get(key)
    }

    /// Number of top-level components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates components in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CalendarComponent)> {
        self.entries.iter()
    }

    /// Components of a given kind, in key order.
    pub fn of_kind(&self, kind: ComponentKind) -> impl Iterator<Item = &CalendarComponent> {
        self.entries.values().filter(move |c| c.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Scalar;

    #[test]
    fn kind_parse() {
        assert_eq!(ComponentKind::parse("VEVENT"), ComponentKind::Event);
        assert_eq!(ComponentKind::parse("vtodo"), ComponentKind::Todo);
        assert_eq!(ComponentKind::parse("X-CUSTOM"), ComponentKind::Other);
        assert!(ComponentKind::Journal.is_schedulable());
        assert!(!ComponentKind::Calendar.is_schedulable());
    }

    #[test]
    fn store_promotes_to_list() {
        let mut c = CalendarComponent::new("VEVENT");
        c.store("attendee", Value::text("a@example.com"));
        assert_eq!(c.get("attendee"), Some(&Value::text("a@example.com")));

        c.store("attendee", Value::text("b@example.com"));
        c.store("attendee", Value::text("c@example.com"));
        let Some(Value::List(items)) = c.get("attendee") else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_text(), Some("a@example.com"));
        assert_eq!(items[2].as_text(), Some("c@example.com"));
    }

    #[test]
    fn uid_accepts_parameterized_text() {
        let mut c = CalendarComponent::new("VEVENT");
        c.store(
            keys::UID,
            Value::WithParams {
                params: Vec::new(),
                value: Scalar::Text("abc".to_string()),
            },
        );
        assert_eq!(c.uid(), Some("abc"));
    }
}
