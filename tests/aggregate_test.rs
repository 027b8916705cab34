//! Integration tests for the aggregates derived from a pass.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use workboard::engine::aggregate::*;
use workboard::engine::duration::enrich;
use workboard::engine::evaluate;
use workboard::model::*;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 20)
        .unwrap()
        .and_hms_opt(15, 30, 0)
        .unwrap()
}

fn days_ago(days: i64) -> NaiveDateTime {
    now() - Duration::days(days)
}

fn enriched(orders: Vec<WorkOrder>) -> Vec<EnrichedOrder> {
    orders.into_iter().map(|o| enrich(o, now())).collect()
}

fn active(id: i64, who: &str) -> WorkOrder {
    WorkOrder::new(id)
        .created(days_ago(3))
        .started(days_ago(2))
        .assignee(who)
}

fn done(id: i64, who: &str, finished: NaiveDateTime) -> WorkOrder {
    WorkOrder::new(id)
        .created(finished - Duration::days(1))
        .started(finished - Duration::hours(6))
        .finished(finished)
        .assignee(who)
}

fn row<'a>(rows: &'a [AssigneeWorkload], who: &str) -> &'a AssigneeWorkload {
    rows.iter()
        .find(|r| r.assignee == who)
        .unwrap_or_else(|| panic!("no workload row for {who}"))
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

#[test]
fn severity_lower_edges_are_inclusive() {
    assert_eq!(severity(Some(7.0)), WaitSeverity::Critical);
    assert_eq!(severity(Some(5.0)), WaitSeverity::Critical);
    assert_eq!(severity(Some(4.999)), WaitSeverity::Warning);
    assert_eq!(severity(Some(2.0)), WaitSeverity::Warning);
    assert_eq!(severity(Some(1.99)), WaitSeverity::Info);
    assert_eq!(severity(Some(0.5)), WaitSeverity::Info);
    assert_eq!(severity(Some(0.49)), WaitSeverity::Nominal);
    assert_eq!(severity(Some(0.0)), WaitSeverity::Nominal);
    assert_eq!(severity(None), WaitSeverity::Default);
}

#[test]
fn orders_created_in_the_future_are_nominal() {
    assert_eq!(severity(Some(-0.25)), WaitSeverity::Nominal);
}

// ---------------------------------------------------------------------------
// Workload and trailing window
// ---------------------------------------------------------------------------

#[test]
fn workload_outer_union_keeps_one_sided_assignees() {
    let orders = enriched(vec![
        active(1, "Ana"),
        active(2, "Ana"),
        done(3, "Bruno", days_ago(1)),
        active(4, "Carla"),
        done(5, "Carla", days_ago(2)),
    ]);

    let rows = workload_by_assignee(&orders, now());
    assert_eq!(rows.len(), 3);

    let ana = row(&rows, "Ana");
    assert_eq!((ana.active, ana.completed_recent), (2, 0));
    let bruno = row(&rows, "Bruno");
    assert_eq!((bruno.active, bruno.completed_recent), (0, 1));
    let carla = row(&rows, "Carla");
    assert_eq!((carla.active, carla.completed_recent), (1, 1));
}

#[test]
fn workload_excludes_unassigned_and_open_orders() {
    let orders = enriched(vec![
        WorkOrder::new(1).created(days_ago(1)).started(days_ago(1)),
        WorkOrder::new(2).created(days_ago(1)).assignee("Ana"),
        WorkOrder::new(3).created(days_ago(2)).finished(days_ago(1)),
    ]);
    assert!(workload_by_assignee(&orders, now()).is_empty());
}

#[test]
fn workload_rows_are_busiest_first_then_by_name() {
    let orders = enriched(vec![
        active(1, "Zeca"),
        active(2, "Bia"),
        active(3, "Bia"),
        done(4, "Alice", days_ago(1)),
        active(5, "Davi"),
    ]);
    let rows = workload_by_assignee(&orders, now());
    let names: Vec<&str> = rows.iter().map(|r| r.assignee.as_str()).collect();
    assert_eq!(names, vec!["Bia", "Davi", "Zeca", "Alice"]);
}

#[test]
fn trailing_window_includes_exactly_seven_days_ago() {
    let boundary = now() - Duration::days(TRAILING_WINDOW_DAYS);
    let orders = enriched(vec![
        done(1, "Ana", boundary),
        done(2, "Ana", boundary - Duration::seconds(1)),
    ]);

    assert!(finished_recently(&orders[0], now()));
    assert!(!finished_recently(&orders[1], now()));

    let rows = workload_by_assignee(&orders, now());
    assert_eq!(row(&rows, "Ana").completed_recent, 1);
}

#[test]
fn old_completions_alone_do_not_create_a_row() {
    let orders = enriched(vec![done(1, "Ana", days_ago(30))]);
    assert!(workload_by_assignee(&orders, now()).is_empty());
}

#[test]
fn completion_tiers_follow_the_colour_bands() {
    assert_eq!(CompletionTier::from_count(0), CompletionTier::Low);
    assert_eq!(CompletionTier::from_count(3), CompletionTier::Low);
    assert_eq!(CompletionTier::from_count(4), CompletionTier::Medium);
    assert_eq!(CompletionTier::from_count(10), CompletionTier::Medium);
    assert_eq!(CompletionTier::from_count(11), CompletionTier::High);
}

// ---------------------------------------------------------------------------
// Top performer
// ---------------------------------------------------------------------------

fn workload(assignee: &str, active: usize, completed_recent: usize) -> AssigneeWorkload {
    AssigneeWorkload {
        assignee: assignee.to_string(),
        active,
        completed_recent,
    }
}

#[test]
fn top_performer_prefers_completions_then_lighter_load() {
    let rows = vec![
        workload("Ana", 1, 4),
        workload("Bruno", 0, 6),
        workload("Carla", 3, 6),
    ];
    assert_eq!(top_performer(&rows).unwrap().assignee, "Bruno");
}

#[test]
fn top_performer_ties_break_by_name() {
    let rows = vec![workload("Zeca", 1, 2), workload("Bia", 1, 2)];
    assert_eq!(top_performer(&rows).unwrap().assignee, "Bia");

    let reversed: Vec<AssigneeWorkload> = rows.into_iter().rev().collect();
    assert_eq!(top_performer(&reversed).unwrap().assignee, "Bia");
}

#[test]
fn top_performer_is_stable_across_reruns() {
    let orders = vec![
        active(1, "Ana"),
        done(2, "Ana", days_ago(1)),
        active(3, "Bruno"),
        done(4, "Bruno", days_ago(2)),
        done(5, "Carla", days_ago(3)),
        active(6, "Carla"),
    ];
    let first = evaluate(orders.clone(), now()).top_performer;
    let second = evaluate(orders, now()).top_performer;
    assert_eq!(first, second);
    assert_eq!(first.as_deref(), Some("Ana"));
}

#[test]
fn no_workload_means_no_top_performer() {
    assert!(top_performer(&[]).is_none());
}

// ---------------------------------------------------------------------------
// Requesters, monthly series, open queue
// ---------------------------------------------------------------------------

#[test]
fn top_requesters_are_ranked_and_capped() {
    let mut orders = Vec::new();
    for i in 0..12 {
        // Requester k appears k + 1 times.
        for j in 0..=i {
            orders.push(
                WorkOrder::new(i * 100 + j)
                    .created(days_ago(1))
                    .requester(format!("R{i:02}")),
            );
        }
    }
    orders.push(WorkOrder::new(9999).created(days_ago(1)));

    let ranked = top_requesters(&enriched(orders), TOP_REQUESTERS);
    assert_eq!(ranked.len(), 10);
    assert_eq!(ranked[0].requester, "R11");
    assert_eq!(ranked[0].count, 12);
    assert_eq!(ranked[9].requester, "R02");
    assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
}

#[test]
fn monthly_series_is_chronological_and_skips_missing_creation() {
    let jan = NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let dec = NaiveDate::from_ymd_opt(2024, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 0)
        .unwrap();
    let orders = enriched(vec![
        WorkOrder::new(1).created(jan),
        WorkOrder::new(2).created(jan).finished(jan),
        WorkOrder::new(3).created(dec).finished(jan),
        WorkOrder::new(4).created(jan),
        WorkOrder::new(5).finished(jan),
    ]);

    let series = monthly_series(&orders);
    let flat: Vec<(String, Status, usize)> = series
        .iter()
        .map(|m| (m.month.to_string(), m.status, m.count))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("2024-12".to_string(), Status::Completed, 1),
            ("2025-01".to_string(), Status::Open, 2),
            ("2025-01".to_string(), Status::Completed, 1),
        ]
    );
}

#[test]
fn open_queue_is_oldest_first_with_unknown_creation_last() {
    let orders = enriched(vec![
        WorkOrder::new(1).created(days_ago(1)),
        WorkOrder::new(2),
        WorkOrder::new(3).created(days_ago(4)),
        WorkOrder::new(4).created(days_ago(9)).started(days_ago(8)),
        WorkOrder::new(5).created(days_ago(2)),
    ]);
    let ids: Vec<Option<i64>> = open_queue(&orders).iter().map(|o| o.order.id).collect();
    assert_eq!(ids, vec![Some(3), Some(5), Some(1), Some(2)]);
}

#[test]
fn assignee_detail_lists_active_and_recent_completions() {
    let orders = enriched(vec![
        active(1, "Ana"),
        done(2, "Ana", days_ago(1)),
        done(3, "Ana", days_ago(20)),
        active(4, "Bruno"),
    ]);
    let detail = assignee_detail(&orders, "Ana", now());
    let active_ids: Vec<Option<i64>> = detail.active.iter().map(|o| o.order.id).collect();
    let done_ids: Vec<Option<i64>> = detail.completed_recent.iter().map(|o| o.order.id).collect();
    assert_eq!(active_ids, vec![Some(1)]);
    assert_eq!(done_ids, vec![Some(2)]);

    let nobody = assignee_detail(&orders, "Nobody", now());
    assert!(nobody.active.is_empty() && nobody.completed_recent.is_empty());
}
