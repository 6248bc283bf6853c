//! Types for the task runner.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::fetcher::{FetchSettings, FetcherError, Interruption};

use super::runner::DEFAULT_FILE_MODE;

/// Errors that end a single target's task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Building the fetcher or fetching the listing failed.
    #[error("r/{subreddit}: {source}")]
    Fetch {
        subreddit: String,
        source: FetcherError,
    },

    /// The destination file could not be opened.
    #[error("r/{subreddit}: cannot open {path}: {source}")]
    FileOpen {
        subreddit: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing the listing to the destination failed.
    #[error("r/{subreddit}: cannot save to {path}: {source}")]
    Save {
        subreddit: String,
        path: PathBuf,
        source: FetcherError,
    },

    /// The task was cancelled before it finished.
    #[error("r/{subreddit}: aborted")]
    Aborted { subreddit: String },

    /// The task panicked.
    #[error("r/{subreddit}: task panicked: {message}")]
    Panicked { subreddit: String, message: String },
}

impl TaskError {
    pub fn subreddit(&self) -> &str {
        match self {
            Self::Fetch { subreddit, .. }
            | Self::FileOpen { subreddit, .. }
            | Self::Save { subreddit, .. }
            | Self::Aborted { subreddit }
            | Self::Panicked { subreddit, .. } => subreddit,
        }
    }

    /// Stable name of the error class, used in run summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { source, .. } | Self::Save { source, .. } => source.kind(),
            Self::FileOpen { .. } => "FileOpenError",
            Self::Aborted { .. } => "Aborted",
            Self::Panicked { .. } => "Panicked",
        }
    }

    /// Whether the fetch stopped because its context was cancelled.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            Self::Fetch {
                source: FetcherError::Interrupted(Interruption::Cancelled),
                ..
            }
        )
    }
}

/// Settings shared by every task of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOptions {
    pub fetch: FetchSettings,
    /// Permission bits used when the destination file is created (unix only).
    pub file_mode: u32,
    /// Truncate an existing destination before writing.
    /// When false, a longer previous file keeps its trailing bytes.
    pub truncate: bool,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            file_mode: DEFAULT_FILE_MODE,
            truncate: false,
        }
    }
}

/// Outcome of a successful task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub subreddit: String,
    pub destination: PathBuf,
    pub posts_written: usize,
    pub elapsed: Duration,
}
