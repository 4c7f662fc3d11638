//! Core data model for decoded iCalendar content.
//!
//! These types are designed for tolerant decoding: unknown properties and
//! unparseable values are captured, never rejected, and consumers
//! pattern-match over [`Value`] variants.

mod component;
mod value;

pub use component::{CalendarComponent, CalendarDocument, ComponentKind, keys};
pub use value::{DateStamp, FreeBusyEntry, GeoPoint, Parameter, Scalar, Value};
