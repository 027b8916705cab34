//! Periodic poll loop: fetch, evaluate, hand the result to the presenter.
//!
//! Cycles never overlap. Each cycle samples "now" exactly once and passes it
//! to the engine. A failed fetch is reported as "no data" for that cycle and
//! the next tick tries again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{FixedOffset, NaiveDateTime, Utc};
use opentelemetry::KeyValue;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::engine::{self, Snapshot};
use crate::ingest;
use crate::source::OrderSource;
use crate::telemetry::cycle::{record_cycle_orders, record_status_counts, start_cycle_span};
use crate::telemetry::metrics;

/// Configuration for the poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    /// Wall-clock frame for "now". `None` means the host's local zone.
    pub utc_offset: Option<FixedOffset>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(crate::config::DEFAULT_POLL_INTERVAL_SECS),
            utc_offset: None,
        }
    }
}

impl From<&Config> for PollConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.poll_interval,
            utc_offset: config.utc_offset,
        }
    }
}

/// What one cycle produced.
#[derive(Debug)]
pub enum CycleOutcome {
    Ready(Box<Snapshot>),
    /// The source failed; nothing to show this cycle.
    NoData {
        at: NaiveDateTime,
        reason: String,
    },
}

impl CycleOutcome {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            CycleOutcome::Ready(snapshot) => Some(snapshot),
            CycleOutcome::NoData { .. } => None,
        }
    }
}

/// Sample the wall clock in the given frame.
pub fn sample_now(utc_offset: Option<FixedOffset>) -> NaiveDateTime {
    ingest::in_frame(&Utc::now(), utc_offset)
}

/// Drives an [`OrderSource`] through the engine on a fixed cadence.
pub struct Poller<S> {
    source: Arc<S>,
    config: PollConfig,
    shutdown: Arc<Notify>,
    cycles: Arc<AtomicU64>,
}

impl<S> Clone for Poller<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            config: self.config.clone(),
            shutdown: Arc::clone(&self.shutdown),
            cycles: Arc::clone(&self.cycles),
        }
    }
}

impl<S: OrderSource> Poller<S> {
    pub fn new(source: Arc<S>, config: PollConfig) -> Self {
        Self {
            source,
            config,
            shutdown: Arc::new(Notify::new()),
            cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Signal the loop to stop after the current cycle.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Cycles completed so far, successful or not.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Run one cycle against the current wall clock.
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.run_cycle_at(sample_now(self.config.utc_offset)).await
    }

    /// Run one cycle with an explicit "now", sampled in the configured frame.
    pub async fn run_cycle_at(&self, now: NaiveDateTime) -> CycleOutcome {
        let source_name = self.source.describe();
        let span = start_cycle_span(&Uuid::new_v4(), &source_name);
        let started = Instant::now();

        let outcome = async {
            match self.source.fetch().await {
                Err(e) => {
                    warn!(source = %source_name, error = %e, "no data available for this cycle");
                    metrics::poll_cycles().add(1, &[KeyValue::new("result", "no_data")]);
                    CycleOutcome::NoData {
                        at: now,
                        reason: e.to_string(),
                    }
                }
                Ok(records) => {
                    let snapshot =
                        engine::evaluate_records(&records, now, self.config.utc_offset);

                    for issue in &snapshot.issues {
                        debug!(%issue, "field skipped");
                        metrics::ingest_issues().add(1, &[KeyValue::new("kind", issue.kind())]);
                    }
                    if !snapshot.issues.is_empty() {
                        warn!(
                            issues = snapshot.issues.len(),
                            "some fields could not be read and were treated as absent"
                        );
                    }

                    record_cycle_orders(&span, snapshot.orders.len());
                    record_status_counts(&span, &snapshot.counts);
                    metrics::orders_evaluated().add(snapshot.orders.len() as u64, &[]);
                    metrics::poll_cycles().add(1, &[KeyValue::new("result", "ok")]);
                    CycleOutcome::Ready(Box::new(snapshot))
                }
            }
        }
        .instrument(span.clone())
        .await;

        metrics::cycle_duration_ms().record(started.elapsed().as_secs_f64() * 1000.0, &[]);
        self.cycles.fetch_add(1, Ordering::Relaxed);
        outcome
    }

    /// Poll until shutdown, handing every outcome to `on_cycle`.
    ///
    /// The first cycle runs immediately. A slow cycle delays the next tick
    /// rather than bunching ticks up.
    pub async fn run<F>(&self, mut on_cycle: F)
    where
        F: FnMut(&CycleOutcome),
    {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            source = %self.source.describe(),
            interval_secs = self.config.interval.as_secs(),
            "poll loop started"
        );

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.notified() => {
                    info!(cycles = self.cycles(), "poll loop shutting down");
                    return;
                }
                _ = ticker.tick() => {
                    let outcome = self.run_cycle().await;
                    on_cycle(&outcome);
                }
            }
        }
    }
}
