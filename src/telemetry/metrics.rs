//! Metric instrument factories for workboard.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without an OTLP endpoint the global provider is a no-op.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("workboard")
}

/// Counter: poll cycles run.
/// Labels: `result` ("ok" | "no_data").
pub fn poll_cycles() -> Counter<u64> {
    meter()
        .u64_counter("workboard.poll.cycles")
        .with_description("Number of poll cycles run")
        .build()
}

/// Counter: work orders classified and timed.
pub fn orders_evaluated() -> Counter<u64> {
    meter()
        .u64_counter("workboard.orders.evaluated")
        .with_description("Number of work orders evaluated")
        .build()
}

/// Counter: data-shape problems found while reading records.
/// Labels: `kind` ("missing_field" | "unparseable_timestamp" | "unparseable_id").
pub fn ingest_issues() -> Counter<u64> {
    meter()
        .u64_counter("workboard.ingest.issues")
        .with_description("Number of record fields that could not be read")
        .build()
}

/// Histogram: fetch plus evaluation time for one cycle, in milliseconds.
pub fn cycle_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("workboard.cycle.duration_ms")
        .with_description("Poll cycle duration in milliseconds")
        .with_unit("ms")
        .build()
}
