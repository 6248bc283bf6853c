//! Types for the run orchestrator.

use crate::task::{TaskError, TaskReport};

/// Result of one run: every task ends up in exactly one of the two lists.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Successful tasks, in completion order.
    pub reports: Vec<TaskReport>,
    /// Failed tasks, in completion order.
    pub failures: Vec<TaskError>,
}

impl RunSummary {
    /// Whether every task succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.reports.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded() + self.failed()
    }

    pub fn posts_written(&self) -> usize {
        self.reports.iter().map(|r| r.posts_written).sum()
    }
}
