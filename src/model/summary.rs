//! Aggregate value types produced by the engine for the board.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use super::order::{EnrichedOrder, Status};

// ---------------------------------------------------------------------------
// Status counts
// ---------------------------------------------------------------------------

/// Total orders and how many are in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Open => self.open,
            Status::InProgress => self.in_progress,
            Status::Completed => self.completed,
        }
    }

    pub(crate) fn add(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Open => self.open += 1,
            Status::InProgress => self.in_progress += 1,
            Status::Completed => self.completed += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// How urgently an Open order needs attention, from its wait time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitSeverity {
    /// Waiting 5 days or more.
    Critical,
    /// Waiting at least 2 days.
    Warning,
    /// Waiting at least half a day.
    Info,
    /// Waiting less than half a day.
    Nominal,
    /// Wait time unknown.
    Default,
}

impl std::fmt::Display for WaitSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WaitSeverity::Critical => "critical",
            WaitSeverity::Warning => "warning",
            WaitSeverity::Info => "info",
            WaitSeverity::Nominal => "nominal",
            WaitSeverity::Default => "default",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Workload
// ---------------------------------------------------------------------------

/// Colour band for an assignee's recent completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionTier {
    /// Three or fewer.
    Low,
    /// Four to ten.
    Medium,
    /// More than ten.
    High,
}

impl CompletionTier {
    pub fn from_count(completed: usize) -> Self {
        match completed {
            0..=3 => CompletionTier::Low,
            4..=10 => CompletionTier::Medium,
            _ => CompletionTier::High,
        }
    }
}

/// One assignee's active and recently finished orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssigneeWorkload {
    pub assignee: String,
    /// Orders currently in progress.
    pub active: usize,
    /// Orders completed inside the trailing window.
    pub completed_recent: usize,
}

impl AssigneeWorkload {
    pub fn tier(&self) -> CompletionTier {
        CompletionTier::from_count(self.completed_recent)
    }
}

/// The orders behind one assignee's workload row.
#[derive(Debug, Clone)]
pub struct AssigneeDetail<'a> {
    pub assignee: String,
    pub active: Vec<&'a EnrichedOrder>,
    pub completed_recent: Vec<&'a EnrichedOrder>,
}

// ---------------------------------------------------------------------------
// Requesters and time series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequesterCount {
    pub requester: String,
    pub count: usize,
}

/// A calendar month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(at: NaiveDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Orders created in `month` that currently have `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: YearMonth,
    pub status: Status,
    pub count: usize,
}
