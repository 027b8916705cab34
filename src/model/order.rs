//! Work orders as fetched, and as enriched by one evaluation pass.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One untyped row from a data source: column name to value.
///
/// Column names may arrive in any case; values may be text, numbers or null.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Work Order
// ---------------------------------------------------------------------------

/// A maintenance ticket, as read from the data source.
///
/// Every field is optional: a record with holes still takes part in every
/// computation that does not need the missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: Option<i64>,
    pub short_description: Option<String>,
    pub requester_name: Option<String>,

    /// Opaque priority label. Never validated against a fixed set.
    pub priority: Option<String>,

    pub created_at: Option<NaiveDateTime>,
    pub started_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,

    /// `None` means unassigned.
    pub assignee_name: Option<String>,
    pub full_description: Option<String>,
}

impl WorkOrder {
    pub fn new(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.short_description = Some(text.into());
        self
    }

    pub fn requester(mut self, name: impl Into<String>) -> Self {
        self.requester_name = Some(name.into());
        self
    }

    pub fn priority(mut self, label: impl Into<String>) -> Self {
        self.priority = Some(label.into());
        self
    }

    pub fn created(mut self, at: NaiveDateTime) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn started(mut self, at: NaiveDateTime) -> Self {
        self.started_at = Some(at);
        self
    }

    pub fn finished(mut self, at: NaiveDateTime) -> Self {
        self.finished_at = Some(at);
        self
    }

    pub fn assignee(mut self, name: impl Into<String>) -> Self {
        self.assignee_name = Some(name.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a work order within one evaluation pass.
///
/// Declaration order is the board's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Created, not started, not finished.
    Open,
    /// Started, not finished.
    InProgress,
    /// Finished, whether or not a start was recorded.
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Completed];

    /// Human-facing label used on the board.
    pub fn label(self) -> &'static str {
        match self {
            Status::Open => "Awaiting start",
            Status::InProgress => "In progress",
            Status::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Enriched Order
// ---------------------------------------------------------------------------

/// A work order plus everything derived from it in one pass.
///
/// Durations are fractional days; `None` means the inputs were incomplete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedOrder {
    #[serde(flatten)]
    pub order: WorkOrder,
    pub status: Status,
    /// Days spent waiting to start, measured to the pass's "now". Open orders only.
    pub wait_time: Option<f64>,
    /// Days from creation to finish.
    pub service_time: Option<f64>,
    /// Days from creation to start.
    pub start_latency: Option<f64>,
}

impl EnrichedOrder {
    /// Assignee name, if the order is assigned.
    pub fn assignee(&self) -> Option<&str> {
        self.order.assignee_name.as_deref()
    }
}
