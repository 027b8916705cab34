//! Poll cycle span helpers.

use tracing::Span;
use uuid::Uuid;

use crate::model::StatusCounts;

/// Start a span covering one poll cycle.
///
/// `cycle.orders` is declared empty and filled by [`record_cycle_orders`].
pub fn start_cycle_span(cycle_id: &Uuid, source: &str) -> Span {
    tracing::info_span!(
        "poll.cycle",
        "cycle.id" = %cycle_id,
        "cycle.source" = source,
        "cycle.orders" = tracing::field::Empty,
    )
}

pub fn record_cycle_orders(span: &Span, orders: usize) {
    span.record("cycle.orders", orders as u64);
}

/// Emit the per-status counts as an event inside the cycle span.
pub fn record_status_counts(span: &Span, counts: &StatusCounts) {
    span.in_scope(|| {
        tracing::info!(
            total = counts.total,
            open = counts.open,
            in_progress = counts.in_progress,
            completed = counts.completed,
            "status_counts"
        );
    });
}
