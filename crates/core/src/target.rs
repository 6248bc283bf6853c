//! Fetch targets: one subreddit, its source URL and its output file.

use std::path::{Path, PathBuf};

/// Default host serving subreddit listings.
pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Default output file name prefix.
pub const DEFAULT_FILE_PREFIX: &str = "reddit_output_";

/// How source URLs and destination paths are derived from a subreddit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
    pub base_url: String,
    /// Directory the output files are written to. Empty means the working directory.
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for TargetLayout {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::new(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

/// One subreddit to fetch. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    subreddit: String,
    source_url: String,
    destination: PathBuf,
}

impl Target {
    pub fn new(
        subreddit: impl Into<String>,
        source_url: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            subreddit: subreddit.into(),
            source_url: source_url.into(),
            destination: destination.into(),
        }
    }

    /// Derive `<base_url>/r/<name>.json` and `<output_dir>/<prefix><name>.txt`.
    pub fn for_subreddit(name: &str, layout: &TargetLayout) -> Self {
        let source_url = format!("{}/r/{}.json", layout.base_url.trim_end_matches('/'), name);
        let destination = layout
            .output_dir
            .join(format!("{}{}.txt", layout.file_prefix, name));
        Self::new(name, source_url, destination)
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}
