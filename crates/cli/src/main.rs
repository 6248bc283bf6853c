use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use subfetch_core::{
    load_config, load_default_config, validate_config, Config, Orchestrator, RunSummary,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming an optional TOML config file
const CONFIG_ENV: &str = "SUBFETCH_CONFIG";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("subfetch {}", VERSION);

    let config = load().context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Subreddits: {}", config.subreddits.join(", "));
    info!(
        "Timeout: {}ms, failure policy: {:?}",
        config.fetch.timeout_ms, config.failure_policy
    );

    let orchestrator = Orchestrator::from_config(&config);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling in-flight fetches");
            on_signal.cancel();
        }
    });

    let summary = orchestrator.run_until_cancelled(cancel).await;
    report(&summary)
}

/// Load the file named by `SUBFETCH_CONFIG`, or the defaults when unset.
fn load() -> Result<Config> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        Err(_) => {
            info!("No {} set, using built-in defaults", CONFIG_ENV);
            Ok(load_default_config()?)
        }
    }
}

/// Log every failure, then fail if there was any.
fn report(summary: &RunSummary) -> Result<()> {
    for failure in &summary.failures {
        error!("[{}] {}", failure.kind(), failure);
    }

    if !summary.is_success() {
        bail!(
            "{} of {} subreddits failed",
            summary.failed(),
            summary.total()
        );
    }

    info!(
        "Wrote {} posts for {} subreddits",
        summary.posts_written(),
        summary.succeeded()
    );
    Ok(())
}
