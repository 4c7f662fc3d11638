//! Tolerant iCalendar (RFC 5545) decoding.
//!
//! Feeds ICS text through a line unfolder, a content-line splitter, and a
//! component stack, producing a [`CalendarDocument`] keyed by UID. Events
//! carrying RECURRENCE-ID are folded into their base event's recurrence
//! table instead of overwriting it, and RRULE lines are compiled into an
//! evaluator-ready form with a synthesized DTSTART when the rule lacks one.
//!
//! The decoder never fails on malformed input: lines without a colon are
//! skipped, values that miss their stricter grammar fall back to unescaped
//! text, and unknown properties are captured generically.
//!
//! ```
//! let doc = koyomi_ical::parse(
//!     "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:1\r\nSUMMARY:Test\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n",
//! );
//! assert_eq!(doc.len(), 1);
//! ```

pub mod core;
pub mod merge;
pub mod parse;
pub mod recur;

pub use crate::core::{
    CalendarComponent, CalendarDocument, ComponentKind, DateStamp, FreeBusyEntry, GeoPoint,
    Parameter, Scalar, Value, keys,
};
pub use parse::parse;
pub use recur::CompiledRule;
