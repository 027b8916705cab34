//! Status and metrics engine.
//!
//! One call to [`evaluate`] is one pass: every order is classified and timed
//! against a single "now", then every aggregate is derived from the result.
//! Nothing is carried over between passes and nothing here does I/O.

pub mod aggregate;
pub mod classify;
pub mod duration;

use chrono::{FixedOffset, NaiveDateTime};
use serde::Serialize;

use crate::ingest::{self, FieldIssue};
use crate::model::*;

/// Everything the board needs from one pass.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// The single "now" every duration in this pass was measured against.
    pub evaluated_at: NaiveDateTime,
    /// Enriched orders, in input order.
    pub orders: Vec<EnrichedOrder>,
    pub counts: StatusCounts,
    pub workload: Vec<AssigneeWorkload>,
    pub top_performer: Option<String>,
    pub top_requesters: Vec<RequesterCount>,
    pub monthly: Vec<MonthlyCount>,
    /// Data-shape problems found while reading the records.
    #[serde(skip)]
    pub issues: Vec<FieldIssue>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Open orders, oldest first.
    pub fn open_queue(&self) -> Vec<&EnrichedOrder> {
        aggregate::open_queue(&self.orders)
    }

    pub fn assignee_detail(&self, assignee: &str) -> AssigneeDetail<'_> {
        aggregate::assignee_detail(&self.orders, assignee, self.evaluated_at)
    }
}

/// Evaluate typed orders against `now`.
pub fn evaluate(orders: Vec<WorkOrder>, now: NaiveDateTime) -> Snapshot {
    let orders: Vec<EnrichedOrder> = orders
        .into_iter()
        .map(|order| duration::enrich(order, now))
        .collect();

    let workload = aggregate::workload_by_assignee(&orders, now);
    let top_performer = aggregate::top_performer(&workload).map(|row| row.assignee.clone());

    Snapshot {
        evaluated_at: now,
        counts: aggregate::status_counts(&orders),
        top_requesters: aggregate::top_requesters(&orders, aggregate::TOP_REQUESTERS),
        monthly: aggregate::monthly_series(&orders),
        workload,
        top_performer,
        orders,
        issues: Vec::new(),
    }
}

/// Read raw source rows and evaluate them against `now`.
///
/// `frame` is the wall-clock frame `now` was sampled in; offset-bearing
/// timestamps are converted into it. `None` means the host's local zone.
pub fn evaluate_records(
    records: &[RawRecord],
    now: NaiveDateTime,
    frame: Option<FixedOffset>,
) -> Snapshot {
    let ingested = ingest::ingest(records, frame);
    let mut snapshot = evaluate(ingested.orders, now);
    snapshot.issues = ingested.issues;
    snapshot
}
