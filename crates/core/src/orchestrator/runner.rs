//! Run orchestrator implementation.

use std::any::Any;
use std::collections::HashMap;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::fetcher::FetchContext;
use crate::target::Target;
use crate::task::{run_target, TaskError, TaskOptions};

use super::config::FailurePolicy;
use super::types::RunSummary;

/// Runs one task per target concurrently and joins them all.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    targets: Vec<Target>,
    options: TaskOptions,
    policy: FailurePolicy,
}

impl Orchestrator {
    pub fn new(targets: Vec<Target>, options: TaskOptions, policy: FailurePolicy) -> Self {
        Self {
            targets,
            options,
            policy,
        }
    }

    /// Build the targets and task options described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let layout = config.target_layout();
        let targets = config
            .subreddits
            .iter()
            .map(|name| Target::for_subreddit(name, &layout))
            .collect();

        Self::new(targets, config.task_options(), config.failure_policy)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run every target to completion.
    pub async fn run(&self) -> RunSummary {
        self.run_until_cancelled(CancellationToken::new()).await
    }

    /// Run every target; cancelling `cancel` interrupts fetches still in flight.
    ///
    /// Tasks whose fetch was interrupted by cancellation are reported as
    /// [`TaskError::Aborted`]. Returns only after every spawned task has finished.
    pub async fn run_until_cancelled(&self, cancel: CancellationToken) -> RunSummary {
        let run_cancel = cancel.child_token();
        info!(
            targets = self.targets.len(),
            policy = ?self.policy,
            "Starting run"
        );

        let mut tasks = JoinSet::new();
        let mut subreddits = HashMap::new();

        for target in &self.targets {
            let target = target.clone();
            let options = self.options.clone();
            let ctx = FetchContext::background().with_cancel(run_cancel.child_token());
            let subreddit = target.subreddit().to_string();

            let handle = tasks.spawn(async move { run_target(&target, &options, &ctx).await });
            subreddits.insert(handle.id(), subreddit);
        }

        let mut summary = RunSummary::default();

        while let Some(joined) = tasks.join_next_with_id().await {
            let outcome = match joined {
                Ok((id, result)) => {
                    subreddits.remove(&id);
                    result
                }
                Err(join_error) => {
                    let subreddit = subreddits.remove(&join_error.id()).unwrap_or_default();
                    if join_error.is_cancelled() {
                        Err(TaskError::Aborted { subreddit })
                    } else {
                        Err(TaskError::Panicked {
                            subreddit,
                            message: panic_message(join_error.into_panic()),
                        })
                    }
                }
            };

            match outcome {
                Ok(report) => summary.reports.push(report),
                Err(error) => {
                    let error = if error.is_cancellation() && run_cancel.is_cancelled() {
                        TaskError::Aborted {
                            subreddit: error.subreddit().to_string(),
                        }
                    } else {
                        error
                    };

                    warn!(
                        subreddit = error.subreddit(),
                        kind = error.kind(),
                        "Task failed: {}",
                        error
                    );

                    if self.policy == FailurePolicy::FailFast
                        && !run_cancel.is_cancelled()
                        && !matches!(error, TaskError::Aborted { .. })
                    {
                        info!("Cancelling remaining tasks after first failure");
                        run_cancel.cancel();
                    }

                    summary.failures.push(error);
                }
            }
        }

        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            posts = summary.posts_written(),
            "Run finished"
        );

        summary
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchSettings;
    use crate::testing::fixtures;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(server: &MockServer, subreddit: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/r/{}.json", subreddit)))
            .respond_with(response)
            .mount(server)
            .await;
    }

    fn ok(posts: &[(&str, &str)]) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(fixtures::listing_body(posts))
    }

    fn targets(server: &MockServer, dir: &TempDir, names: &[&str]) -> Vec<Target> {
        names
            .iter()
            .map(|name| {
                Target::new(
                    *name,
                    format!("{}/r/{}.json", server.uri(), name),
                    dir.path().join(format!("reddit_output_{}.txt", name)),
                )
            })
            .collect()
    }

    fn options() -> TaskOptions {
        TaskOptions {
            fetch: FetchSettings {
                timeout: Duration::from_secs(5),
                ..FetchSettings::default()
            },
            ..TaskOptions::default()
        }
    }

    #[tokio::test]
    async fn test_collect_all_reports_every_outcome() {
        let server = MockServer::start().await;
        serve(&server, "golang", ok(&[("Go", "http://go")])).await;
        serve(&server, "docker", ResponseTemplate::new(429)).await;
        serve(&server, "aws", ok(&[("S3", "http://s3")])).await;

        let dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(
            targets(&server, &dir, &["golang", "docker", "aws"]),
            options(),
            FailurePolicy::CollectAll,
        );

        let summary = orchestrator.run().await;

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.is_success());
        let failure = &summary.failures[0];
        assert_eq!(failure.subreddit(), "docker");
        assert_eq!(failure.kind(), "UnexpectedStatusError");
        assert!(!dir.path().join("reddit_output_docker.txt").exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("reddit_output_aws.txt")).unwrap(),
            "S3\nhttp://s3\n\n"
        );
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_slow_siblings() {
        let server = MockServer::start().await;
        serve(&server, "golang", ResponseTemplate::new(500)).await;
        serve(
            &server,
            "docker",
            ok(&[("D", "http://d")]).set_delay(Duration::from_secs(3)),
        )
        .await;
        serve(
            &server,
            "aws",
            ok(&[("A", "http://a")]).set_delay(Duration::from_secs(3)),
        )
        .await;

        let dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(
            targets(&server, &dir, &["golang", "docker", "aws"]),
            options(),
            FailurePolicy::FailFast,
        );

        let started = std::time::Instant::now();
        let summary = orchestrator.run().await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(summary.succeeded(), 0);
        assert_eq!(summary.failed(), 3);

        let aborted: Vec<_> = summary
            .failures
            .iter()
            .filter(|e| matches!(e, TaskError::Aborted { .. }))
            .map(|e| e.subreddit().to_string())
            .collect();
        assert_eq!(aborted.len(), 2);
        assert!(aborted.contains(&"docker".to_string()));
        assert!(aborted.contains(&"aws".to_string()));
    }

    #[tokio::test]
    async fn test_cancelled_run_aborts_everything() {
        let server = MockServer::start().await;
        serve(&server, "golang", ok(&[("Go", "http://go")])).await;

        let dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(
            targets(&server, &dir, &["golang"]),
            options(),
            FailurePolicy::CollectAll,
        );

        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = orchestrator.run_until_cancelled(cancel).await;

        assert_eq!(summary.failed(), 1);
        assert!(matches!(summary.failures[0], TaskError::Aborted { .. }));
        assert!(!dir.path().join("reddit_output_golang.txt").exists());
    }

    #[tokio::test]
    async fn test_from_config_derives_default_targets() {
        let orchestrator = Orchestrator::from_config(&Config::default());
        let names: Vec<_> = orchestrator
            .targets()
            .iter()
            .map(|t| t.subreddit().to_string())
            .collect();
        assert_eq!(names, vec!["golang", "docker", "kubernetes", "aws", "googlecloud"]);
        assert_eq!(
            orchestrator.targets()[0].source_url(),
            "https://www.reddit.com/r/golang.json"
        );
        assert_eq!(orchestrator.policy(), FailurePolicy::CollectAll);
    }

    #[tokio::test]
    async fn test_empty_run_is_success() {
        let orchestrator = Orchestrator::new(vec![], options(), FailurePolicy::CollectAll);
        let summary = orchestrator.run().await;
        assert!(summary.is_success());
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("bang".to_string())), "bang");
        assert_eq!(panic_message(Box::new(42u8)), "unknown panic");
    }
}
