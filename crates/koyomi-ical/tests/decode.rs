//! End-to-end decoding over complete ICS documents.

use chrono::{TimeZone, Utc};
use koyomi_ical::{ComponentKind, Value, keys, parse};

#[test_log::test]
fn basic_event() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         DTSTART:20200101T090000Z\r\n\
         SUMMARY:Test\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    let event = doc.get("1").expect("event keyed by UID");
    assert_eq!(event.kind, ComponentKind::Event);
    assert_eq!(event.get(keys::SUMMARY), Some(&Value::text("Test")));

    let start = event.get(keys::START).and_then(Value::as_date).unwrap();
    assert!(start.utc);
    assert_eq!(
        start.utc_instant(),
        Some(Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap())
    );
}

#[test_log::test]
fn folded_summary_is_rejoined() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         SUMMARY:Quarterly planning\r\n\
         \x20\\, budget\\, and staffing review\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    let event = doc.get("1").unwrap();
    assert_eq!(
        event.get(keys::SUMMARY),
        Some(&Value::text("Quarterly planning, budget, and staffing review"))
    );
}

#[test_log::test]
fn exception_dates_keyed_by_day() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         EXDATE:20200101,20200102\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    let event = doc.get("1").unwrap();
    let map = event
        .get(keys::EXDATE)
        .and_then(Value::as_exception_dates)
        .unwrap();
    assert_eq!(map.len(), 2);
    assert!(map.contains_key("2020-01-01"));
    assert!(map.contains_key("2020-01-02"));
}

#[test_log::test]
fn uidless_events_survive_under_generated_keys() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         SUMMARY:first\r\n\
         END:VEVENT\r\n\
         BEGIN:VEVENT\r\n\
         SUMMARY:second\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    assert_eq!(doc.len(), 2);
    let ids: Vec<&String> = doc.iter().map(|(k, _)| k).collect();
    assert_ne!(ids[0], ids[1]);
}

#[test_log::test]
fn recurring_event_with_override() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         DTSTART:20200106T090000Z\r\n\
         SUMMARY:Standup\r\n\
         RRULE:FREQ=WEEKLY;COUNT=4\r\n\
         END:VEVENT\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         RECURRENCE-ID:20200113T090000Z\r\n\
         DTSTART:20200113T100000Z\r\n\
         SUMMARY:Standup (moved)\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    assert_eq!(doc.len(), 1);
    let base = doc.get("1").unwrap();
    assert_eq!(base.get(keys::SUMMARY), Some(&Value::text("Standup")));
    // The base keeps no stray recurrence id of its own.
    assert_eq!(base.get(keys::RECURRENCE_ID), None);

    let overrides = base.recurrences.as_ref().unwrap();
    let moved = overrides.get("2020-01-13").expect("override keyed by day");
    assert_eq!(
        moved.get(keys::SUMMARY),
        Some(&Value::text("Standup (moved)"))
    );
    assert!(moved.recurrences.is_none());
}

#[test_log::test]
fn override_arriving_before_its_base() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         RECURRENCE-ID:20200113T090000Z\r\n\
         SUMMARY:Moved\r\n\
         END:VEVENT\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         DTSTART:20200106T090000Z\r\n\
         RRULE:FREQ=WEEKLY;COUNT=4\r\n\
         SUMMARY:Base\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    let base = doc.get("1").unwrap();
    assert_eq!(base.get(keys::SUMMARY), Some(&Value::text("Base")));
    let overrides = base.recurrences.as_ref().unwrap();
    assert_eq!(
        overrides.get("2020-01-13").unwrap().get(keys::SUMMARY),
        Some(&Value::text("Moved"))
    );
}

#[test_log::test]
fn rule_without_dtstart_borrows_the_event_start() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         DTSTART:20200101T090000Z\r\n\
         RRULE:FREQ=DAILY;COUNT=3\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    let event = doc.get("1").unwrap();
    let rule = event
        .get(keys::RRULE)
        .and_then(Value::as_compiled_rule)
        .expect("rule compiled");
    assert!(rule.canonical().starts_with("DTSTART:20200101T090000Z"));
    assert_eq!(rule.evaluator().clone().all(10).dates.len(), 3);
}

#[test_log::test]
fn nested_alarm_and_timezone_components() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VTIMEZONE\r\n\
         TZID:America/New_York\r\n\
         END:VTIMEZONE\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         BEGIN:VALARM\r\n\
         ACTION:DISPLAY\r\n\
         END:VALARM\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    assert_eq!(doc.len(), 2);
    assert_eq!(doc.of_kind(ComponentKind::Timezone).count(), 1);
    let event = doc.get("1").unwrap();
    assert_eq!(event.components.len(), 1);
}

#[test_log::test]
fn later_calendar_wins_on_concatenated_input() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         UID:old\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n\
         BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         UID:new\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    assert_eq!(doc.len(), 1);
    assert!(doc.get("new").is_some());
}

#[test_log::test]
fn unknown_and_extension_properties_are_captured() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         X-MICROSOFT-CDO-BUSYSTATUS:BUSY\r\n\
         REQUEST-STATUS:2.0;Success\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    let event = doc.get("1").unwrap();
    assert_eq!(
        event.get("MICROSOFT-CDO-BUSYSTATUS"),
        Some(&Value::text("BUSY"))
    );
    assert_eq!(
        event.get("request-status"),
        Some(&Value::text("2.0;Success"))
    );
}

#[test_log::test]
fn garbage_lines_do_not_derail_the_document() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         this line has no separator\r\n\
         BEGIN:VEVENT\r\n\
         UID:1\r\n\
         DTSTART:not-a-date\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    );

    let event = doc.get("1").unwrap();
    // The broken date survives as plain text.
    assert_eq!(event.get(keys::START), Some(&Value::text("not-a-date")));
}

#[test_log::test]
fn todo_completion_and_freebusy_windows() {
    let doc = parse(
        "BEGIN:VCALENDAR\r\n\
         BEGIN:VTODO\r\n\
         UID:t1\r\n\
         PERCENT-COMPLETE:40\r\n\
         END:VTODO\r\n\
         BEGIN:VFREEBUSY\r\n\
         UID:f1\r\n\
         FREEBUSY;FBTYPE=FREE:20200101T090000Z/20200101T100000Z\r\n\
         END:VFREEBUSY\r\n\
         END:VCALENDAR\r\n",
    );

    let todo = doc.get("t1").unwrap();
    assert_eq!(todo.kind, ComponentKind::Todo);
    assert_eq!(todo.get(keys::COMPLETION), Some(&Value::text("40")));

    let fb = doc.get("f1").unwrap();
    let Some(Value::FreeBusy(entries)) = fb.get(keys::FREEBUSY) else {
        panic!("freebusy entries expected");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].fbtype, "FREE");
}
