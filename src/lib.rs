//! # workboard
//!
//! Status and metrics engine for a maintenance work-order board.
//!
//! Classifies raw work orders into Open / InProgress / Completed, computes
//! their timing metrics against a single sampled "now", and derives the
//! aggregates a wall-mounted board shows: status counts, assignee workload,
//! recent completions, top requesters and a monthly series. Includes a
//! Postgres source, a poll loop, a text renderer and OpenTelemetry wiring.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod model;
pub mod poll;
pub mod render;
pub mod source;
pub mod telemetry;
