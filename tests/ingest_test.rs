//! Integration tests for reading raw source rows.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::{Value, json};
use workboard::ingest::{FieldIssue, ingest, parse_timestamp};
use workboard::model::RawRecord;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn utc() -> Option<FixedOffset> {
    FixedOffset::east_opt(0)
}

fn record(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn full_record() -> Value {
    json!({
        "id": 42,
        "short_description": "Replace bulb",
        "requester_name": "Radiology",
        "priority": "E",
        "created_at": "2025-04-01 07:15:00",
        "started_at": "2025-04-01 09:00:00",
        "finished_at": null,
        "assignee_name": "Rosa",
        "full_description": "Room 4, ceiling"
    })
}

#[test]
fn complete_record_reads_cleanly() {
    let out = ingest(&[record(full_record())], utc());
    assert!(out.issues.is_empty());

    let order = &out.orders[0];
    assert_eq!(order.id, Some(42));
    assert_eq!(order.short_description.as_deref(), Some("Replace bulb"));
    assert_eq!(order.requester_name.as_deref(), Some("Radiology"));
    assert_eq!(order.priority.as_deref(), Some("E"));
    assert_eq!(order.created_at, Some(at(2025, 4, 1, 7, 15, 0)));
    assert_eq!(order.started_at, Some(at(2025, 4, 1, 9, 0, 0)));
    assert_eq!(order.finished_at, None);
    assert_eq!(order.assignee_name.as_deref(), Some("Rosa"));
}

#[test]
fn field_names_are_case_insensitive() {
    let out = ingest(&[record(json!({
        "Id": "7",
        "SHORT_DESCRIPTION": "Door",
        "Requester_Name": "Lab",
        "PRIORITY": 2,
        "Created_At": "2025-04-01T10:00:00",
        "STARTED_AT": null,
        "finished_AT": null,
        "ASSIGNEE_NAME": null,
        "full_description": null
    }))], utc());
    assert!(out.issues.is_empty());
    let order = &out.orders[0];
    assert_eq!(order.id, Some(7));
    assert_eq!(order.priority.as_deref(), Some("2"));
    assert_eq!(order.created_at, Some(at(2025, 4, 1, 10, 0, 0)));
}

#[test]
fn missing_columns_become_absent_and_are_reported() {
    let mut raw = record(full_record());
    raw.remove("assignee_name");
    raw.remove("created_at");

    let out = ingest(&[raw], utc());
    let order = &out.orders[0];
    assert_eq!(order.assignee_name, None);
    assert_eq!(order.created_at, None);
    assert_eq!(order.started_at, Some(at(2025, 4, 1, 9, 0, 0)));

    assert_eq!(out.issues.len(), 2);
    assert!(out.issues.contains(&FieldIssue::MissingField {
        record: 0,
        field: "created_at"
    }));
    assert!(out.issues.iter().all(|i| i.kind() == "missing_field"));
}

#[test]
fn unparseable_timestamps_become_absent() {
    let mut raw = record(full_record());
    raw.insert("started_at".into(), json!("yesterday-ish"));

    let out = ingest(&[raw], utc());
    assert_eq!(out.orders[0].started_at, None);
    assert_eq!(
        out.issues,
        vec![FieldIssue::UnparseableTimestamp {
            record: 0,
            field: "started_at",
            value: "\"yesterday-ish\"".to_string(),
        }]
    );
}

#[test]
fn blank_text_is_absent_without_an_issue() {
    let mut raw = record(full_record());
    raw.insert("assignee_name".into(), json!("   "));
    raw.insert("finished_at".into(), json!(""));

    let out = ingest(&[raw], utc());
    assert!(out.issues.is_empty());
    assert_eq!(out.orders[0].assignee_name, None);
    assert_eq!(out.orders[0].finished_at, None);
}

#[test]
fn bad_id_is_reported_but_the_record_is_kept() {
    let mut raw = record(full_record());
    raw.insert("id".into(), json!("OS-12"));

    let out = ingest(&[raw], utc());
    assert_eq!(out.orders.len(), 1);
    assert_eq!(out.orders[0].id, None);
    assert_eq!(out.issues[0].kind(), "unparseable_id");
}

#[test]
fn issues_name_the_record_they_came_from() {
    let mut second = record(full_record());
    second.remove("priority");
    let out = ingest(&[record(full_record()), second], utc());
    assert_eq!(
        out.issues,
        vec![FieldIssue::MissingField {
            record: 1,
            field: "priority"
        }]
    );
    assert_eq!(
        out.issues[0].to_string(),
        "record 1: missing field `priority`"
    );
}

#[test]
fn lenient_timestamp_layouts() {
    let expected = at(2025, 4, 1, 7, 15, 0);
    for text in [
        "2025-04-01 07:15:00",
        "2025-04-01T07:15:00",
        "2025-04-01 07:15",
        "2025-04-01T07:15",
        "01/04/2025 07:15:00",
        "01/04/2025 07:15",
        "  2025-04-01 07:15:00  ",
    ] {
        assert_eq!(parse_timestamp(text, utc()), Some(expected), "layout {text:?}");
    }

    assert_eq!(
        parse_timestamp("2025-04-01 07:15:00.250", utc()),
        Some(at(2025, 4, 1, 7, 15, 0) + chrono::Duration::milliseconds(250))
    );
    assert_eq!(parse_timestamp("2025-04-01", utc()), Some(at(2025, 4, 1, 0, 0, 0)));
    assert_eq!(parse_timestamp("01/04/2025", utc()), Some(at(2025, 4, 1, 0, 0, 0)));
}

#[test]
fn offsets_convert_into_a_utc_frame() {
    assert_eq!(
        parse_timestamp("2025-04-01T07:15:00-03:00", utc()),
        Some(at(2025, 4, 1, 10, 15, 0))
    );
    assert_eq!(
        parse_timestamp("2025-04-01 07:15:00-03", utc()),
        Some(at(2025, 4, 1, 10, 15, 0))
    );
    assert_eq!(
        parse_timestamp("2025-04-01T07:15:00Z", utc()),
        Some(at(2025, 4, 1, 7, 15, 0))
    );
}

#[test]
fn offsets_convert_into_the_sampling_frame() {
    let minus_three = FixedOffset::west_opt(3 * 3600);
    assert_eq!(
        parse_timestamp("2025-03-10 08:00:00-03", minus_three),
        Some(at(2025, 3, 10, 8, 0, 0))
    );
    assert_eq!(
        parse_timestamp("2025-03-10T14:00:00Z", minus_three),
        Some(at(2025, 3, 10, 11, 0, 0))
    );
    // Naive text is already wall-clock in whatever frame the source uses.
    assert_eq!(
        parse_timestamp("2025-03-10 08:00:00", minus_three),
        Some(at(2025, 3, 10, 8, 0, 0))
    );
}

#[test]
fn garbage_does_not_parse() {
    for text in ["", "soon", "2025-13-01 00:00:00", "31/02/2025 10:00"] {
        assert_eq!(parse_timestamp(text, utc()), None, "text {text:?}");
    }
}

#[test]
fn epoch_seconds_are_accepted() {
    let out = ingest(&[record(json!({
        "id": 1, "short_description": null, "requester_name": null, "priority": null,
        "created_at": 1_743_491_700, "started_at": null, "finished_at": null,
        "assignee_name": null, "full_description": null
    }))], utc());
    assert!(out.issues.is_empty());
    assert_eq!(out.orders[0].created_at, Some(at(2025, 4, 1, 7, 15, 0)));
}

#[test]
fn epoch_seconds_land_in_the_sampling_frame() {
    let raw = record(json!({
        "id": 1, "short_description": null, "requester_name": null, "priority": null,
        "created_at": 1_743_491_700, "started_at": null, "finished_at": null,
        "assignee_name": null, "full_description": null
    }));
    let out = ingest(&[raw], FixedOffset::east_opt(2 * 3600));
    assert_eq!(out.orders[0].created_at, Some(at(2025, 4, 1, 9, 15, 0)));
}
