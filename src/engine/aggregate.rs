//! Aggregates over one pass's enriched orders.
//!
//! Every function here is independent of the others and takes the full
//! collection. Empty input yields zero counts and empty collections.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDateTime};

use crate::model::{
    AssigneeDetail, AssigneeWorkload, EnrichedOrder, MonthlyCount, RequesterCount, Status,
    StatusCounts, WaitSeverity, YearMonth,
};

/// Length of the "recent completions" lookback.
pub const TRAILING_WINDOW_DAYS: i64 = 7;

/// How many requesters the frequency ranking keeps.
pub const TOP_REQUESTERS: usize = 10;

pub const CRITICAL_WAIT_DAYS: f64 = 5.0;
pub const WARNING_WAIT_DAYS: f64 = 2.0;
pub const INFO_WAIT_DAYS: f64 = 0.5;

pub fn status_counts(orders: &[EnrichedOrder]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for order in orders {
        counts.add(order.status);
    }
    counts
}

/// Bucket a wait time. Lower edges are inclusive; anything under half a
/// day, negative spans included, is nominal.
pub fn severity(wait_time: Option<f64>) -> WaitSeverity {
    match wait_time {
        None => WaitSeverity::Default,
        Some(days) if days >= CRITICAL_WAIT_DAYS => WaitSeverity::Critical,
        Some(days) if days >= WARNING_WAIT_DAYS => WaitSeverity::Warning,
        Some(days) if days >= INFO_WAIT_DAYS => WaitSeverity::Info,
        Some(_) => WaitSeverity::Nominal,
    }
}

/// First instant inside the trailing window ending at `now`.
pub fn window_start(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::days(TRAILING_WINDOW_DAYS)
}

/// A Completed order counts as recent when it finished at or after the window start.
pub fn finished_recently(order: &EnrichedOrder, now: NaiveDateTime) -> bool {
    order.status == Status::Completed
        && order
            .order
            .finished_at
            .is_some_and(|finished| finished >= window_start(now))
}

/// Active and recently completed counts per assignee, outer-joined on name.
///
/// Unassigned orders are left out. Rows come back busiest first, then by name.
pub fn workload_by_assignee(orders: &[EnrichedOrder], now: NaiveDateTime) -> Vec<AssigneeWorkload> {
    let mut by_name: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for order in orders {
        let Some(name) = order.assignee() else {
            continue;
        };
        if order.status == Status::InProgress {
            by_name.entry(name).or_default().0 += 1;
        } else if finished_recently(order, now) {
            by_name.entry(name).or_default().1 += 1;
        }
    }

    let mut rows: Vec<AssigneeWorkload> = by_name
        .into_iter()
        .map(|(name, (active, completed_recent))| AssigneeWorkload {
            assignee: name.to_string(),
            active,
            completed_recent,
        })
        .collect();

    // Stable: equal workloads keep the name order from the map.
    rows.sort_by(|a, b| b.active.cmp(&a.active));
    rows
}

/// Ranking for the top performer: most recent completions, then lightest
/// active load, then name.
pub fn performer_order(a: &AssigneeWorkload, b: &AssigneeWorkload) -> Ordering {
    b.completed_recent
        .cmp(&a.completed_recent)
        .then(a.active.cmp(&b.active))
        .then_with(|| a.assignee.cmp(&b.assignee))
}

pub fn top_performer(workload: &[AssigneeWorkload]) -> Option<&AssigneeWorkload> {
    workload.iter().min_by(|a, b| performer_order(a, b))
}

/// Most frequent requesters, descending, ties by name. Orders without a
/// requester are not counted.
pub fn top_requesters(orders: &[EnrichedOrder], limit: usize) -> Vec<RequesterCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for order in orders {
        if let Some(name) = order.order.requester_name.as_deref() {
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<RequesterCount> = counts
        .into_iter()
        .map(|(requester, count)| RequesterCount {
            requester: requester.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.requester.cmp(&b.requester)));
    ranked.truncate(limit);
    ranked
}

/// Orders per (creation month, status), chronological. Orders without a
/// creation time are left out.
pub fn monthly_series(orders: &[EnrichedOrder]) -> Vec<MonthlyCount> {
    let mut buckets: BTreeMap<(YearMonth, Status), usize> = BTreeMap::new();
    for order in orders {
        if let Some(created) = order.order.created_at {
            *buckets.entry((YearMonth::of(created), order.status)).or_insert(0) += 1;
        }
    }
    buckets
        .into_iter()
        .map(|((month, status), count)| MonthlyCount {
            month,
            status,
            count,
        })
        .collect()
}

/// Open orders, oldest first. Orders without a creation time go last;
/// otherwise input order is kept.
pub fn open_queue(orders: &[EnrichedOrder]) -> Vec<&EnrichedOrder> {
    let mut queue: Vec<&EnrichedOrder> = orders
        .iter()
        .filter(|order| order.status == Status::Open)
        .collect();
    queue.sort_by(|a, b| match (a.order.created_at, b.order.created_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    queue
}

/// The in-progress and recently completed orders behind one workload row.
pub fn assignee_detail<'a>(
    orders: &'a [EnrichedOrder],
    assignee: &str,
    now: NaiveDateTime,
) -> AssigneeDetail<'a> {
    let mine = || orders.iter().filter(move |o| o.assignee() == Some(assignee));
    AssigneeDetail {
        assignee: assignee.to_string(),
        active: mine().filter(|o| o.status == Status::InProgress).collect(),
        completed_recent: mine().filter(|o| finished_recently(o, now)).collect(),
    }
}
