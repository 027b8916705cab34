//! Plain-text board for a terminal or a wall-mounted screen.
//!
//! Reads a [`Snapshot`]; never computes anything the engine already did.

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::engine::Snapshot;
use crate::engine::aggregate::{TRAILING_WINDOW_DAYS, severity};
use crate::model::{CompletionTier, EnrichedOrder, Status, WaitSeverity};

/// Most workload cards shown in one row of the board.
pub const MAX_WORKLOAD_CARDS: usize = 9;

const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

#[derive(Debug, Clone, Default)]
pub struct BoardOptions {
    /// Assignee whose detail section is expanded.
    pub assignee: Option<String>,
}

pub fn format_timestamp(at: Option<NaiveDateTime>) -> String {
    at.map(|t| t.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn format_days(days: Option<f64>) -> String {
    days.map(|d| format!("{d:.2} days"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn severity_tag(severity: WaitSeverity) -> &'static str {
    match severity {
        WaitSeverity::Critical => "[!!]",
        WaitSeverity::Warning => "[! ]",
        WaitSeverity::Info => "[i ]",
        WaitSeverity::Nominal => "[ok]",
        WaitSeverity::Default => "[--]",
    }
}

fn tier_tag(tier: CompletionTier) -> &'static str {
    match tier {
        CompletionTier::Low => "low",
        CompletionTier::Medium => "medium",
        CompletionTier::High => "high",
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

/// Render the whole board.
pub fn render_board(snapshot: &Snapshot, options: &BoardOptions) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Work Order Board");
    let _ = writeln!(
        out,
        "Updated {}",
        snapshot.evaluated_at.format("%d/%m/%Y %H:%M:%S")
    );
    let _ = writeln!(out);

    let counts = &snapshot.counts;
    let _ = writeln!(
        out,
        "Total {} | Completed {} | In progress {} | Awaiting start {}",
        counts.total, counts.completed, counts.in_progress, counts.open
    );
    let _ = writeln!(out);

    render_open_queue(&mut out, snapshot);
    render_workload(&mut out, snapshot);

    if let Some(assignee) = options.assignee.as_deref() {
        render_detail(&mut out, snapshot, assignee);
    }

    out
}

fn render_open_queue(out: &mut String, snapshot: &Snapshot) {
    let queue = snapshot.open_queue();
    let _ = writeln!(out, "## {}", Status::Open.label());

    if queue.is_empty() {
        let _ = writeln!(out, "No work orders awaiting start.");
        let _ = writeln!(out);
        return;
    }

    let _ = writeln!(
        out,
        "{} work orders awaiting start, oldest first.",
        queue.len()
    );
    for order in queue {
        let _ = writeln!(
            out,
            "{} {} | waiting {}",
            severity_tag(severity(order.wait_time)),
            order_headline(order),
            format_days(order.wait_time)
        );
        let _ = writeln!(
            out,
            "     requester {} | created {} | assignee {}",
            or_na(order.order.requester_name.as_deref()),
            format_timestamp(order.order.created_at),
            order.assignee().unwrap_or("Unassigned")
        );
    }
    let _ = writeln!(out);
}

fn render_workload(out: &mut String, snapshot: &Snapshot) {
    let _ = writeln!(out, "## Workload");

    if snapshot.workload.is_empty() {
        let _ = writeln!(
            out,
            "No active or recently completed work orders with an assignee."
        );
        let _ = writeln!(out);
        return;
    }

    for row in snapshot.workload.iter().take(MAX_WORKLOAD_CARDS) {
        let crown = if snapshot.top_performer.as_deref() == Some(row.assignee.as_str()) {
            "* "
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "- {crown}{}: {} active, {} completed in {} days ({})",
            row.assignee,
            row.active,
            row.completed_recent,
            TRAILING_WINDOW_DAYS,
            tier_tag(row.tier())
        );
    }
    if snapshot.workload.len() > MAX_WORKLOAD_CARDS {
        let _ = writeln!(
            out,
            "  ... and {} more",
            snapshot.workload.len() - MAX_WORKLOAD_CARDS
        );
    }
    let _ = writeln!(out);
}

fn render_detail(out: &mut String, snapshot: &Snapshot, assignee: &str) {
    let detail = snapshot.assignee_detail(assignee);
    let _ = writeln!(out, "## Details for {}", detail.assignee);

    if detail.active.is_empty() {
        let _ = writeln!(out, "No active work orders for {assignee}.");
    } else {
        let _ = writeln!(out, "Active ({}):", detail.active.len());
        for order in &detail.active {
            let _ = writeln!(
                out,
                "- {} | started {}",
                order_headline(order),
                format_timestamp(order.order.started_at)
            );
        }
    }

    if detail.completed_recent.is_empty() {
        let _ = writeln!(
            out,
            "No work orders completed in the last {TRAILING_WINDOW_DAYS} days by {assignee}."
        );
    } else {
        let _ = writeln!(
            out,
            "Completed in the last {TRAILING_WINDOW_DAYS} days ({}):",
            detail.completed_recent.len()
        );
        for order in &detail.completed_recent {
            let _ = writeln!(
                out,
                "- {} | finished {} | service time {}",
                order_headline(order),
                format_timestamp(order.order.finished_at),
                format_days(order.service_time)
            );
        }
    }
    let _ = writeln!(out);
}

fn order_headline(order: &EnrichedOrder) -> String {
    let id = order
        .order
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!(
        "#{id} [{}] {}",
        or_na(order.order.priority.as_deref()),
        or_na(order.order.short_description.as_deref())
    )
}

/// Shown in place of the board when the source failed this cycle.
pub fn render_no_data(at: NaiveDateTime, reason: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Work Order Board");
    let _ = writeln!(out, "Updated {}", at.format("%d/%m/%Y %H:%M:%S"));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Work orders could not be loaded ({reason}). Retrying on the next poll."
    );
    out
}
