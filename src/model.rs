//! Core data model.
//!
//! A work order is a maintenance ticket: opened, optionally started,
//! optionally finished. Everything the board shows is derived from those
//! three timestamps plus who asked for the work and who is doing it.

pub mod order;
pub mod summary;

pub use order::{EnrichedOrder, RawRecord, Status, WorkOrder};
pub use summary::{
    AssigneeDetail, AssigneeWorkload, CompletionTier, MonthlyCount, RequesterCount, StatusCounts,
    WaitSeverity, YearMonth,
};
