//! Error types for the fetcher module.

use std::fmt;

use thiserror::Error;

/// Why a fetch stopped before the server answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// The context's cancellation token fired.
    Cancelled,
    /// The context's deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "context canceled"),
            Self::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

/// Errors that can occur while fetching or saving a listing.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// The HTTP client or the request could not be built (e.g. malformed URL).
    #[error("cannot create request: {0}")]
    RequestBuild(String),

    /// Network failure, including the client timeout.
    #[error("cannot get data: {0}")]
    Transport(#[from] reqwest::Error),

    /// The fetch context was cancelled or its deadline passed.
    #[error("cannot get data: {0}")]
    Interrupted(Interruption),

    /// The server answered with something other than 200 OK.
    #[error("unexpected status code: {code}")]
    UnexpectedStatus { code: u16 },

    /// The body was not a listing document.
    #[error("cannot unmarshal data: {0}")]
    Decode(String),

    /// Writing to the sink failed.
    #[error("cannot write data: {0}")]
    Write(#[from] std::io::Error),
}

impl FetcherError {
    /// Stable name of the error class, used in run summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestBuild(_) => "RequestBuildError",
            Self::Transport(_) | Self::Interrupted(_) => "TransportError",
            Self::UnexpectedStatus { .. } => "UnexpectedStatusError",
            Self::Decode(_) => "DecodeError",
            Self::Write(_) => "WriteError",
        }
    }

    /// Whether this is a transport-class failure (network, timeout, cancellation).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Interrupted(_))
    }

    /// Whether the failure was caused by a timeout or an expired deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Interrupted(reason) => *reason == Interruption::DeadlineExceeded,
            _ => false,
        }
    }

    /// Status code carried by an `UnexpectedStatus` error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { code } => Some(*code),
            _ => None,
        }
    }
}
