//! Derived timing metrics, in fractional days.
//!
//! "now" is always a parameter. Negative spans (finish before creation in
//! the source data) are returned as-is.

use chrono::NaiveDateTime;

use super::classify::{classify, status_of};
use crate::model::{EnrichedOrder, Status, WorkOrder};

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Elapsed days from `from` to `to`. No calendar rounding.
///
/// Microsecond resolution; spans too long for that fall back to milliseconds.
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let span = to - from;
    let seconds = match span.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => span.num_milliseconds() as f64 / 1000.0,
    };
    seconds / SECONDS_PER_DAY
}

/// Days an Open order has been waiting, measured to `now`.
pub fn wait_time(order: &WorkOrder, now: NaiveDateTime) -> Option<f64> {
    if status_of(order) != Status::Open {
        return None;
    }
    order.created_at.map(|created| days_between(created, now))
}

/// Days from creation to finish, whatever the status.
pub fn service_time(order: &WorkOrder) -> Option<f64> {
    Some(days_between(order.created_at?, order.finished_at?))
}

/// Days from creation to start, whatever the status.
pub fn start_latency(order: &WorkOrder) -> Option<f64> {
    Some(days_between(order.created_at?, order.started_at?))
}

/// Classify an order and compute every derived metric against `now`.
pub fn enrich(order: WorkOrder, now: NaiveDateTime) -> EnrichedOrder {
    let status = classify(order.started_at, order.finished_at);
    EnrichedOrder {
        wait_time: wait_time(&order, now),
        service_time: service_time(&order),
        start_latency: start_latency(&order),
        status,
        order,
    }
}
