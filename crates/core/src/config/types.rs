use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::{FetchSettings, DEFAULT_USER_AGENT};
use crate::orchestrator::{FailurePolicy, DEFAULT_SUBREDDITS};
use crate::target::{TargetLayout, DEFAULT_BASE_URL, DEFAULT_FILE_PREFIX};
use crate::task::{TaskOptions, DEFAULT_FILE_MODE};

/// Root configuration. An empty document is valid and yields the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Subreddits to fetch, one task each.
    #[serde(default = "default_subreddits")]
    pub subreddits: Vec<String>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subreddits: default_subreddits(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Config {
    pub fn target_layout(&self) -> TargetLayout {
        TargetLayout {
            base_url: self.fetch.base_url.clone(),
            output_dir: self.output.dir.clone(),
            file_prefix: self.output.file_prefix.clone(),
        }
    }

    pub fn task_options(&self) -> TaskOptions {
        TaskOptions {
            fetch: self.fetch.settings(),
            file_mode: self.output.file_mode,
            truncate: self.output.truncate,
        }
    }
}

fn default_subreddits() -> Vec<String> {
    DEFAULT_SUBREDDITS.iter().map(|s| s.to_string()).collect()
}

/// HTTP fetch configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Host serving `/r/<name>.json` (default: https://www.reddit.com)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overall per-request timeout in milliseconds (default: 3000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Disable HTTP/2 negotiation (default: true)
    #[serde(default = "default_true")]
    pub http1_only: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            http1_only: true,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn settings(&self) -> FetchSettings {
        FetchSettings {
            timeout: self.timeout(),
            user_agent: self.user_agent.clone(),
            http1_only: self.http1_only,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

/// Output file configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory for output files (default: working directory)
    #[serde(default)]
    pub dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Permission bits for created files (default: 0o755)
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
    /// Truncate existing files before writing (default: false)
    #[serde(default)]
    pub truncate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::new(),
            file_prefix: default_file_prefix(),
            file_mode: default_file_mode(),
            truncate: false,
        }
    }
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}
