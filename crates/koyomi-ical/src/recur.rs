//! Recurrence rule normalization.
//!
//! A schedulable component's captured `RRULE` line is rewritten into the
//! evaluator's canonical string and compiled on component close. Every
//! failure path is non-fatal: the raw text stays in place and the problem is
//! reported via tracing.

use rrule::RRuleSet;

use crate::core::{CalendarComponent, DateStamp, Value, keys};
use crate::parse::values::parse_ymd;

/// A recurrence rule compiled by the external evaluator.
///
/// Wraps the canonical rule string together with the evaluator object able
/// to enumerate occurrence instants and answer range queries.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    canonical: String,
    set: RRuleSet,
}

impl CompiledRule {
    /// The canonical string the evaluator was constructed from.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The evaluator itself.
    #[must_use]
    pub fn evaluator(&self) -> &RRuleSet {
        &self.set
    }
}

impl PartialEq for CompiledRule {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

/// Normalizes a closing component's captured rule, if any.
///
/// Strips the `RRULE:` marker, synthesizes a `DTSTART` clause from the
/// component's start value when the rule lacks one (coercing an 8-digit bare
/// start first), and swaps the raw text for the compiled evaluator object.
pub fn normalize(component: &mut CalendarComponent) {
    let Some(Value::RawRule(line)) = component.get(keys::RRULE) else {
        return;
    };
    let rule = line
        .strip_prefix("RRULE:")
        .unwrap_or(line.as_str())
        .to_string();

    let canonical = if let Some((start, rest)) = extract_embedded_start(&rule) {
        // Some producers embed the start inside the rule (`;DTSTART=...`);
        // the evaluator wants it as a separate clause.
        format!("DTSTART:{start}\nRRULE:{rest}")
    } else {
        coerce_bare_start(component);
        match start_stamp(component) {
            Some(stamp) => format!("DTSTART:{}\nRRULE:{rule}", stamp.compact()),
            None => {
                tracing::error!("no usable start value to synthesize DTSTART from");
                format!("RRULE:{rule}")
            }
        }
    };

    match canonical.parse::<RRuleSet>() {
        Ok(set) => {
            component.properties.insert(
                keys::RRULE.to_string(),
                Value::CompiledRule(Box::new(CompiledRule { canonical, set })),
            );
        }
        Err(err) => {
            tracing::warn!(%err, rule = %canonical, "evaluator rejected rule, keeping raw text");
        }
    }
}

/// Splits a `DTSTART=...` part out of the rule text, returning the start
/// value and the rule with that part removed.
fn extract_embedded_start(rule: &str) -> Option<(String, String)> {
    let mut start = None;
    let mut parts = Vec::new();
    for part in rule.split(';') {
        match part.strip_prefix("DTSTART=") {
            Some(value) => start = Some(value.to_string()),
            None => parts.push(part),
        }
    }
    start.map(|s| (s, parts.join(";")))
}

/// An 8-digit bare-text start (a dateless producer's `DTSTART:20200101`) is
/// coerced into a date-only stamp in place. Failures leave the field
/// unchanged.
fn coerce_bare_start(component: &mut CalendarComponent) {
    let Some(Value::Scalar(scalar)) = component.get(keys::START) else {
        return;
    };
    let Some(text) = scalar.as_text() else {
        return;
    };
    if text.len() != 8 {
        return;
    }
    match parse_ymd(text).and_then(|d| d.and_hms_opt(0, 0, 0)) {
        Some(naive) => {
            component.properties.insert(
                keys::START.to_string(),
                Value::Date(DateStamp {
                    naive,
                    utc: false,
                    tzid: None,
                    date_only: true,
                }),
            );
        }
        None => {
            tracing::error!(start = text, "8-digit start is not a calendar date, leaving as-is");
        }
    }
}

fn start_stamp(component: &CalendarComponent) -> Option<&DateStamp> {
    component.get(keys::START)?.as_date()
}
