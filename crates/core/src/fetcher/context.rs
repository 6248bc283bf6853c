//! Per-fetch context: cancellation, deadline and request tracing.

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::error::Interruption;

/// Identifies a single fetch in logs and on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTrace {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl RequestTrace {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

impl Default for RequestTrace {
    fn default() -> Self {
        Self::new()
    }
}

/// Context handed to every fetch.
///
/// Cancellation is cooperative: the fetcher stops waiting on the network as
/// soon as the token fires or the deadline passes. The client timeout still
/// applies independently.
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub cancel: CancellationToken,
    pub deadline: Option<Instant>,
    pub trace: RequestTrace,
}

impl FetchContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: None,
            trace: RequestTrace::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the interruption reason if the context is already done.
    pub fn interruption(&self) -> Option<Interruption> {
        if self.cancel.is_cancelled() {
            return Some(Interruption::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Interruption::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> Interruption {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.cancel.cancelled() => Interruption::Cancelled,
                _ = tokio::time::sleep_until(deadline) => Interruption::DeadlineExceeded,
            },
            None => {
                self.cancel.cancelled().await;
                Interruption::Cancelled
            }
        }
    }
}
