//! Listing fetcher.
//!
//! A fetcher performs one GET against a subreddit JSON endpoint, decodes the
//! listing and keeps it until it is saved to a sink.

mod config;
mod context;
mod error;
mod http;

pub use config::{FetchSettings, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use context::{FetchContext, RequestTrace};
pub use error::{FetcherError, Interruption};
pub use http::{Fetcher, REQUEST_ID_HEADER};

use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// Fetch-then-save contract implemented by listing sources.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    /// Fetch and decode the listing, replacing any previously stored one.
    ///
    /// On error the stored listing is left as it was.
    async fn fetch(&mut self, ctx: &FetchContext) -> Result<(), FetcherError>;

    /// Write the stored listing to `sink`, one `title\nurl\n\n` block per post,
    /// and return the number of posts written.
    ///
    /// Without a prior successful fetch this writes nothing and succeeds.
    /// A write failure aborts immediately; bytes already written stay in the sink.
    async fn save(
        &self,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<usize, FetcherError>;
}
