//! Concurrent subreddit listing fetcher.
//!
//! One task per subreddit fetches `/r/<name>.json`, decodes the posts and
//! writes their titles and URLs to a dedicated output file.

pub mod config;
pub mod fetcher;
pub mod listing;
pub mod orchestrator;
pub mod target;
pub mod task;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_default_config, validate_config, Config, ConfigError,
    FetchConfig, OutputConfig,
};
pub use fetcher::{
    FetchContext, FetchSettings, Fetcher, FetcherError, Interruption, ListingFetcher, RequestTrace,
};
pub use listing::{Child, Listing, ListingData, Post};
pub use orchestrator::{FailurePolicy, Orchestrator, RunSummary, DEFAULT_SUBREDDITS};
pub use target::{Target, TargetLayout};
pub use task::{run_target, run_with_fetcher, TaskError, TaskOptions, TaskReport};
