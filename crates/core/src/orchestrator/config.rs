//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Subreddits fetched when none are configured.
pub const DEFAULT_SUBREDDITS: [&str; 5] = ["golang", "docker", "kubernetes", "aws", "googlecloud"];

/// What the orchestrator does when a task fails.
///
/// Either way a single failure fails the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Let every task finish and report all failures.
    #[default]
    CollectAll,
    /// Cancel the remaining fetches as soon as one task fails.
    FailFast,
}
