//! Run orchestrator.
//!
//! Launches one task per target, all at once, and returns after every task
//! has finished. Completion is the join of the spawned tasks; nothing else is
//! shared between them.

mod config;
mod runner;
mod types;

pub use config::{FailurePolicy, DEFAULT_SUBREDDITS};
pub use runner::Orchestrator;
pub use types::RunSummary;
