//! Status classification.

use chrono::NaiveDateTime;

use crate::model::{Status, WorkOrder};

/// Classify from the two lifecycle timestamps alone.
///
/// A finish time always wins, even without a recorded start.
pub fn classify(started_at: Option<NaiveDateTime>, finished_at: Option<NaiveDateTime>) -> Status {
    match (started_at, finished_at) {
        (_, Some(_)) => Status::Completed,
        (Some(_), None) => Status::InProgress,
        (None, None) => Status::Open,
    }
}

pub fn status_of(order: &WorkOrder) -> Status {
    classify(order.started_at, order.finished_at)
}
