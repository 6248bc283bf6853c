//! HTTP listing fetcher backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Request, StatusCode};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info_span, Instrument};

use crate::listing::Listing;

use super::config::FetchSettings;
use super::context::FetchContext;
use super::error::FetcherError;
use super::ListingFetcher;

/// Header carrying the per-fetch trace id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Fetches one subreddit listing and holds it until saved.
///
/// Each instance owns its own client and is driven by a single task.
pub struct Fetcher {
    client: Client,
    source_url: String,
    user_agent: String,
    output: Listing,
}

impl Fetcher {
    /// Create a fetcher with the given overall timeout and default settings otherwise.
    pub fn new(source_url: impl Into<String>, timeout: Duration) -> Result<Self, FetcherError> {
        let settings = FetchSettings {
            timeout,
            ..FetchSettings::default()
        };
        Self::with_settings(source_url, &settings)
    }

    /// Create a fetcher from explicit settings.
    pub fn with_settings(
        source_url: impl Into<String>,
        settings: &FetchSettings,
    ) -> Result<Self, FetcherError> {
        let mut builder = Client::builder().timeout(settings.timeout);
        if settings.http1_only {
            builder = builder.http1_only();
        }
        let client = builder
            .build()
            .map_err(|e| FetcherError::RequestBuild(format!("cannot create client: {}", e)))?;

        Ok(Self {
            client,
            source_url: source_url.into(),
            user_agent: settings.user_agent.clone(),
            output: Listing::default(),
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// The most recently fetched listing (empty before the first successful fetch).
    pub fn listing(&self) -> &Listing {
        &self.output
    }

    fn build_request(&self, ctx: &FetchContext) -> Result<Request, FetcherError> {
        self.client
            .get(&self.source_url)
            .header(USER_AGENT, &self.user_agent)
            .header(REQUEST_ID_HEADER, ctx.trace.id.to_string())
            .build()
            .map_err(|e| FetcherError::RequestBuild(e.to_string()))
    }

    /// Send the request and decode the body. The response is consumed on every path.
    async fn exchange(&self, request: Request) -> Result<Listing, FetcherError> {
        let response = self.client.execute(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            debug!(
                status = status.as_u16(),
                body_len = body.len(),
                "Discarding non-OK response"
            );
            return Err(FetcherError::UnexpectedStatus {
                code: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<Option<Listing>>(&body)
            .map(Option::unwrap_or_default)
            .map_err(|e| FetcherError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ListingFetcher for Fetcher {
    async fn fetch(&mut self, ctx: &FetchContext) -> Result<(), FetcherError> {
        let span = info_span!(
            "fetch",
            url = %self.source_url,
            trace_id = %ctx.trace.id,
            started_at = ctx.trace.started_at.timestamp(),
        );

        async move {
            if let Some(reason) = ctx.interruption() {
                return Err(FetcherError::Interrupted(reason));
            }

            let request = self.build_request(ctx)?;
            debug!("Sending listing request");

            let listing = tokio::select! {
                reason = ctx.done() => return Err(FetcherError::Interrupted(reason)),
                result = self.exchange(request) => result?,
            };

            debug!(posts = listing.len(), "Decoded listing");
            self.output = listing;
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn save(
        &self,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<usize, FetcherError> {
        let mut written = 0;
        for post in self.output.posts() {
            sink.write_all(post.render().as_bytes()).await?;
            written += 1;
        }
        sink.flush().await?;
        Ok(written)
    }
}
