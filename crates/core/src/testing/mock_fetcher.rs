//! Mock listing fetcher for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::RwLock;

use crate::fetcher::{FetchContext, FetcherError, ListingFetcher};
use crate::listing::Listing;

use super::fixtures;

/// Mock implementation of the ListingFetcher trait.
///
/// Clones share state, so a test can keep a handle while the runner owns
/// another one:
/// - Serve a canned listing
/// - Fail the next fetch with a given error
/// - Delay fetches so cancellation and deadlines can land mid-flight
/// - Count fetch and save calls
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    /// Listing returned by the next successful fetch.
    served: Arc<RwLock<Listing>>,
    /// Listing stored by the last successful fetch.
    stored: Arc<RwLock<Listing>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<FetcherError>>>,
    /// Simulated network latency.
    delay: Arc<RwLock<Duration>>,
    fetch_calls: Arc<RwLock<usize>>,
    save_calls: Arc<RwLock<usize>>,
}

impl MockFetcher {
    /// Create a mock that serves the given `(title, url)` posts.
    pub fn with_posts(posts: &[(&str, &str)]) -> Self {
        Self {
            served: Arc::new(RwLock::new(fixtures::listing(posts))),
            ..Self::default()
        }
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetcherError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    pub async fn fetch_count(&self) -> usize {
        *self.fetch_calls.read().await
    }

    pub async fn save_count(&self) -> usize {
        *self.save_calls.read().await
    }
}

#[async_trait]
impl ListingFetcher for MockFetcher {
    async fn fetch(&mut self, ctx: &FetchContext) -> Result<(), FetcherError> {
        *self.fetch_calls.write().await += 1;

        if let Some(reason) = ctx.interruption() {
            return Err(FetcherError::Interrupted(reason));
        }

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::select! {
                reason = ctx.done() => return Err(FetcherError::Interrupted(reason)),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let served = self.served.read().await.clone();
        *self.stored.write().await = served;
        Ok(())
    }

    async fn save(
        &self,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<usize, FetcherError> {
        *self.save_calls.write().await += 1;

        let stored = self.stored.read().await.clone();
        for post in stored.posts() {
            sink.write_all(post.render().as_bytes()).await?;
        }
        sink.flush().await?;
        Ok(stored.len())
    }
}
