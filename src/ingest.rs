//! Turning raw source rows into typed work orders.
//!
//! Field names are matched case-insensitively. Anything that cannot be read
//! becomes `None` on the order and a [`FieldIssue`] on the side; ingestion
//! itself never fails.
//!
//! Timestamps that pin an instant (explicit offset, epoch seconds) are moved
//! into the wall-clock frame "now" is sampled in, so durations never mix
//! frames. Naive text is already wall-clock and is taken as-is.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;
use thiserror::Error;

use crate::model::{RawRecord, WorkOrder};

/// Columns every record is expected to carry.
pub const FIELDS: [&str; 9] = [
    "id",
    "short_description",
    "requester_name",
    "priority",
    "created_at",
    "started_at",
    "finished_at",
    "assignee_name",
    "full_description",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// A data-shape problem found in one record. Reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIssue {
    #[error("record {record}: missing field `{field}`")]
    MissingField { record: usize, field: &'static str },

    #[error("record {record}: unparseable timestamp in `{field}`: {value}")]
    UnparseableTimestamp {
        record: usize,
        field: &'static str,
        value: String,
    },

    #[error("record {record}: unparseable id: {value}")]
    UnparseableId { record: usize, value: String },
}

impl FieldIssue {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldIssue::MissingField { .. } => "missing_field",
            FieldIssue::UnparseableTimestamp { .. } => "unparseable_timestamp",
            FieldIssue::UnparseableId { .. } => "unparseable_id",
        }
    }
}

/// Orders read from one batch of records, plus whatever went wrong on the way.
#[derive(Debug, Default)]
pub struct Ingested {
    pub orders: Vec<WorkOrder>,
    pub issues: Vec<FieldIssue>,
}

/// Wall-clock time of `at` in `frame`. `None` means the host's local zone.
pub fn in_frame<Tz: TimeZone>(at: &DateTime<Tz>, frame: Option<FixedOffset>) -> NaiveDateTime {
    match frame {
        Some(offset) => at.with_timezone(&offset).naive_local(),
        None => at.with_timezone(&Local).naive_local(),
    }
}

/// Read every record, preserving input order.
pub fn ingest(records: &[RawRecord], frame: Option<FixedOffset>) -> Ingested {
    let mut ingested = Ingested {
        orders: Vec::with_capacity(records.len()),
        issues: Vec::new(),
    };
    for (index, record) in records.iter().enumerate() {
        let order = read_record(index, record, frame, &mut ingested.issues);
        ingested.orders.push(order);
    }
    ingested
}

/// Read one record. Problems are appended to `issues`.
pub fn read_record(
    index: usize,
    record: &RawRecord,
    frame: Option<FixedOffset>,
    issues: &mut Vec<FieldIssue>,
) -> WorkOrder {
    let fields: HashMap<String, &Value> = record
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value))
        .collect();

    let mut reader = RecordReader {
        index,
        frame,
        fields,
        issues,
    };

    WorkOrder {
        id: reader.id(),
        short_description: reader.text("short_description"),
        requester_name: reader.text("requester_name"),
        priority: reader.text("priority"),
        created_at: reader.timestamp("created_at"),
        started_at: reader.timestamp("started_at"),
        finished_at: reader.timestamp("finished_at"),
        assignee_name: reader.text("assignee_name"),
        full_description: reader.text("full_description"),
    }
}

struct RecordReader<'a> {
    index: usize,
    frame: Option<FixedOffset>,
    fields: HashMap<String, &'a Value>,
    issues: &'a mut Vec<FieldIssue>,
}

impl<'a> RecordReader<'a> {
    fn field(&mut self, name: &'static str) -> Option<&'a Value> {
        match self.fields.get(name) {
            Some(value) => Some(*value),
            None => {
                self.issues.push(FieldIssue::MissingField {
                    record: self.index,
                    field: name,
                });
                None
            }
        }
    }

    fn text(&mut self, name: &'static str) -> Option<String> {
        match self.field(name)? {
            Value::String(s) => non_blank(s).map(str::to_string),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn id(&mut self) -> Option<i64> {
        let parsed = match self.field("id")? {
            Value::Null => return None,
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => match non_blank(s) {
                Some(s) => s.parse().ok(),
                None => return None,
            },
            _ => None,
        };
        if parsed.is_none() {
            let value = self.fields.get("id").map(|v| v.to_string()).unwrap_or_default();
            self.issues.push(FieldIssue::UnparseableId {
                record: self.index,
                value,
            });
        }
        parsed
    }

    fn timestamp(&mut self, name: &'static str) -> Option<NaiveDateTime> {
        let parsed = match self.field(name)? {
            Value::Null => return None,
            Value::String(s) => match non_blank(s) {
                Some(s) => parse_timestamp(s, self.frame),
                None => return None,
            },
            Value::Number(n) => n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|dt| in_frame(&dt, self.frame)),
            _ => None,
        };
        if parsed.is_none() {
            let value = self.fields.get(name).map(|v| v.to_string()).unwrap_or_default();
            self.issues.push(FieldIssue::UnparseableTimestamp {
                record: self.index,
                field: name,
                value,
            });
        }
        parsed
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parse a timestamp leniently. `None` if no known layout matches.
///
/// Text carrying an explicit offset is converted to wall-clock time in
/// `frame`; everything else is taken as-is. Bare dates mean midnight.
pub fn parse_timestamp(text: &str, frame: Option<FixedOffset>) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(in_frame(&dt, frame));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(in_frame(&dt, frame));
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
