//! Fetcher settings.

use std::time::Duration;

/// Overall per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Custom Agent";

/// Settings used to build a fetcher's HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Overall timeout covering connect, send and body read.
    pub timeout: Duration,
    pub user_agent: String,
    /// Speak HTTP/1.1 only and never negotiate HTTP/2.
    /// Reddit answers repeated fast HTTP/2 requests with 429.
    pub http1_only: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http1_only: true,
        }
    }
}
