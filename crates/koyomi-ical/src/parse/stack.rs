//! Component stack assembler and the parse entry point.
//!
//! A state machine over BEGIN/END markers: BEGIN pushes the in-progress
//! frame and opens a new one, END folds the closing frame into its parent
//! through the merge engine. Everything else mutates the frame on top.

use std::mem;

use super::content_line::ContentLine;
use super::lexer::logical_lines;
use super::registry;
use crate::core::{CalendarComponent, CalendarDocument, ComponentKind};
use crate::{merge, recur};

/// Decodes iCalendar text into a [`CalendarDocument`].
///
/// Tolerant by contract: malformed lines are skipped, unparseable values
/// fall back to text, unknown properties are captured generically. This
/// never fails for structurally odd but textually present data.
#[must_use]
pub fn parse(input: &str) -> CalendarDocument {
    tracing::debug!(input_len = input.len(), "decoding calendar text");

    let mut frames = FrameStack::new();
    for line in logical_lines(input) {
        frames.feed(&line);
    }
    frames.finish()
}

/// The frame stack: in-progress parents below, the active frame on top.
///
/// Each parse call owns its own stack and output, so independent calls can
/// run concurrently on separate threads.
struct FrameStack {
    stack: Vec<CalendarComponent>,
    current: CalendarComponent,
}

impl FrameStack {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            // The root frame is a parse artifact; it only ever holds
            // whatever precedes BEGIN:VCALENDAR and is discarded with it.
            current: CalendarComponent::new(""),
        }
    }

    fn feed(&mut self, line: &str) {
        let Some(content) = ContentLine::decode(line) else {
            tracing::trace!(line, "no colon separator, line skipped");
            return;
        };

        match content.name.as_str() {
            "BEGIN" => self.begin(&content.raw_value),
            "END" => self.end(&content.raw_value),
            _ => registry::apply(&content, line, !self.stack.is_empty(), &mut self.current),
        }
    }

    fn begin(&mut self, marker: &str) {
        let frame = CalendarComponent::new(marker);
        self.stack.push(mem::replace(&mut self.current, frame));
    }

    fn end(&mut self, marker: &str) {
        let kind = ComponentKind::parse(marker);

        if kind == ComponentKind::Calendar {
            // Terminal state: the calendar frame stays current and becomes
            // the document; the frame beneath it (and any scalar artifacts
            // it held) is discarded.
            if self.stack.pop().is_none() {
                tracing::warn!("END:VCALENDAR without a matching BEGIN");
            }
            return;
        }

        if kind.is_schedulable() {
            recur::normalize(&mut self.current);
        }

        match self.stack.pop() {
            Some(parent) => {
                let child = mem::replace(&mut self.current, parent);
                merge::fold_into(child, &mut self.current);
            }
            None => {
                tracing::warn!(marker, "END without a matching BEGIN, skipped");
            }
        }
    }

    fn finish(self) -> CalendarDocument {
        if !self.stack.is_empty() {
            tracing::warn!(
                open_frames = self.stack.len(),
                "input ended with unclosed components"
            );
        }
        CalendarDocument {
            entries: self.current.components,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Value, keys};
    use chrono::{TimeZone, Utc};

    #[test]
    fn minimal_event_document() {
        let input = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nUID:1\nDTSTART:20200101T090000Z\nSUMMARY:Test\nEND:VEVENT\nEND:VCALENDAR";
        let doc = parse(input);

        assert_eq!(doc.len(), 1);
        let event = doc.get("1").unwrap();
        assert_eq!(event.kind, ComponentKind::Event);
        assert_eq!(event.get(keys::SUMMARY), Some(&Value::text("Test")));
        let start = event.get(keys::START).and_then(Value::as_date).unwrap();
        assert_eq!(
            start.utc_instant(),
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn calendar_scalars_do_not_reach_the_document() {
        let input = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//EN\r\nBEGIN:VEVENT\r\nUID:1\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let doc = parse(input);
        // Only the component survives; VERSION/PRODID are frame-local.
        assert_eq!(doc.len(), 1);
        assert!(doc.get("1").is_some());
    }

    #[test]
    fn nested_alarm_closes_into_its_event() {
        let input = "\
BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
UID:1\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
DESCRIPTION:Reminder\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let doc = parse(input);
        let event = doc.get("1").unwrap();
        // The alarm has no UID: it sits under a generated key.
        assert_eq!(event.components.len(), 1);
        let alarm = event.components.values().next().unwrap();
        assert_eq!(alarm.kind, ComponentKind::Alarm);
        assert_eq!(alarm.get("action"), Some(&Value::text("DISPLAY")));
    }

    #[test]
    fn uidless_events_get_distinct_keys() {
        let input = "\
BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:first\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:second\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let doc = parse(input);
        assert_eq!(doc.len(), 2);
        let summaries: Vec<_> = doc
            .iter()
            .filter_map(|(_, c)| c.get(keys::SUMMARY).and_then(Value::as_text))
            .collect();
        assert!(summaries.contains(&"first"));
        assert!(summaries.contains(&"second"));
    }

    #[test]
    fn unmatched_end_is_skipped() {
        let input = "END:VEVENT\r\nBEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:1\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let doc = parse(input);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn unclosed_component_yields_its_children() {
        // Missing END:VCALENDAR; the calendar frame is still current.
        let input = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:1\r\nEND:VEVENT\r\n";
        let doc = parse(input);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_document() {
        assert!(parse("").is_empty());
    }
}
