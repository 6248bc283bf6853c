use std::collections::HashSet;

use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one subreddit, each a plain name, no duplicates
///   (two tasks must never write the same output file)
/// - Timeout is not 0
/// - Base URL is an absolute http(s) URL
/// - File mode fits in permission bits
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.subreddits.is_empty() {
        return Err(ConfigError::ValidationError(
            "subreddits cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in &config.subreddits {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::ValidationError(format!(
                "invalid subreddit name: {:?}",
                name
            )));
        }
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate subreddit: {}",
                name
            )));
        }
    }

    if config.fetch.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "fetch.timeout_ms cannot be 0".to_string(),
        ));
    }

    match Url::parse(&config.fetch.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => {
            return Err(ConfigError::ValidationError(format!(
                "fetch.base_url is not an http(s) URL: {}",
                config.fetch.base_url
            )))
        }
    }

    if config.output.file_mode > 0o7777 {
        return Err(ConfigError::ValidationError(format!(
            "output.file_mode out of range: {:o}",
            config.output.file_mode
        )));
    }

    Ok(())
}
