//! Per-target task implementation.
//!
//! Within one task, fetch strictly precedes opening the destination, which
//! strictly precedes saving. A failed fetch never touches the filesystem.

use std::path::Path;
use std::time::Instant;

use tokio::fs::{File, OpenOptions};
use tracing::{debug, info};

use crate::fetcher::{FetchContext, Fetcher, ListingFetcher};
use crate::target::Target;

use super::types::{TaskError, TaskOptions, TaskReport};

/// Permission bits for newly created output files.
pub const DEFAULT_FILE_MODE: u32 = 0o755;

/// Fetch one target over HTTP and write its listing to the destination file.
pub async fn run_target(
    target: &Target,
    options: &TaskOptions,
    ctx: &FetchContext,
) -> Result<TaskReport, TaskError> {
    let fetcher = Fetcher::with_settings(target.source_url(), &options.fetch).map_err(|source| {
        TaskError::Fetch {
            subreddit: target.subreddit().to_string(),
            source,
        }
    })?;

    run_with_fetcher(fetcher, target, options, ctx).await
}

/// Drive `fetcher` through fetch, open, save and close for `target`.
pub async fn run_with_fetcher<F: ListingFetcher>(
    mut fetcher: F,
    target: &Target,
    options: &TaskOptions,
    ctx: &FetchContext,
) -> Result<TaskReport, TaskError> {
    let started = Instant::now();
    let subreddit = target.subreddit();

    debug!(subreddit, url = target.source_url(), "Fetching listing");
    fetcher
        .fetch(ctx)
        .await
        .map_err(|source| TaskError::Fetch {
            subreddit: subreddit.to_string(),
            source,
        })?;

    let mut file = open_destination(target.destination(), options)
        .await
        .map_err(|source| TaskError::FileOpen {
            subreddit: subreddit.to_string(),
            path: target.destination().to_path_buf(),
            source,
        })?;

    let posts_written = fetcher
        .save(&mut file)
        .await
        .map_err(|source| TaskError::Save {
            subreddit: subreddit.to_string(),
            path: target.destination().to_path_buf(),
            source,
        })?;
    drop(file);

    let elapsed = started.elapsed();
    info!(
        subreddit,
        posts = posts_written,
        path = %target.destination().display(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Saved listing"
    );

    Ok(TaskReport {
        subreddit: subreddit.to_string(),
        destination: target.destination().to_path_buf(),
        posts_written,
        elapsed,
    })
}

/// Open read-write, creating the file with `options.file_mode` if absent.
async fn open_destination(path: &Path, options: &TaskOptions) -> std::io::Result<File> {
    let mut open = OpenOptions::new();
    open.read(true).write(true).create(true);
    if options.truncate {
        open.truncate(true);
    }
    #[cfg(unix)]
    open.mode(options.file_mode);

    open.open(path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetcherError, FetchSettings};
    use crate::testing::{fixtures, MockFetcher};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target_in(dir: &TempDir, subreddit: &str) -> Target {
        Target::new(
            subreddit,
            format!("http://unused/r/{}.json", subreddit),
            dir.path().join(format!("reddit_output_{}.txt", subreddit)),
        )
    }

    #[tokio::test]
    async fn test_run_writes_listing_to_file() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir, "golang");
        let fetcher = MockFetcher::with_posts(&[("A", "http://a"), ("B", "http://b")]);

        let report = run_with_fetcher(
            fetcher.clone(),
            &target,
            &TaskOptions::default(),
            &FetchContext::background(),
        )
        .await
        .unwrap();

        assert_eq!(report.posts_written, 2);
        assert_eq!(report.subreddit, "golang");
        let content = std::fs::read_to_string(target.destination()).unwrap();
        assert_eq!(content, "A\nhttp://a\n\nB\nhttp://b\n\n");
        assert_eq!(fetcher.save_count().await, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_skips_save_and_file() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir, "docker");
        let fetcher = MockFetcher::with_posts(&[("A", "http://a")]);
        fetcher
            .set_next_error(FetcherError::UnexpectedStatus { code: 503 })
            .await;

        let err = run_with_fetcher(
            fetcher.clone(),
            &target,
            &TaskOptions::default(),
            &FetchContext::background(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            TaskError::Fetch {
                source: FetcherError::UnexpectedStatus { code: 503 },
                ..
            }
        ));
        assert_eq!(fetcher.save_count().await, 0);
        assert!(!target.destination().exists());
    }

    #[tokio::test]
    async fn test_cancelled_slow_fetch_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir, "golang");
        let fetcher = MockFetcher::with_posts(&[("A", "http://a")]);
        fetcher.set_delay(Duration::from_secs(10)).await;

        let cancel = CancellationToken::new();
        let ctx = FetchContext::background().with_cancel(cancel.clone());
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        });

        let started = std::time::Instant::now();
        let err = run_with_fetcher(fetcher.clone(), &target, &TaskOptions::default(), &ctx)
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(err.is_cancellation(), "got {:?}", err);
        assert_eq!(err.kind(), "TransportError");
        assert_eq!(fetcher.fetch_count().await, 1);
        assert_eq!(fetcher.save_count().await, 0);
        assert!(!target.destination().exists());
    }

    #[tokio::test]
    async fn test_slow_fetch_past_deadline_is_timeout() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir, "aws");
        let fetcher = MockFetcher::with_posts(&[("A", "http://a")]);
        fetcher.set_delay(Duration::from_secs(10)).await;

        let ctx = FetchContext::background()
            .with_deadline(tokio::time::Instant::now() + Duration::from_millis(50));
        let err = run_with_fetcher(fetcher, &target, &TaskOptions::default(), &ctx)
            .await
            .unwrap_err();

        match err {
            TaskError::Fetch { source, .. } => assert!(source.is_timeout(), "got {:?}", source),
            other => panic!("expected fetch error, got {:?}", other),
        }
        assert!(!target.destination().exists());
    }

    #[tokio::test]
    async fn test_missing_directory_is_file_open_error() {
        let dir = TempDir::new().unwrap();
        let target = Target::new(
            "aws",
            "http://unused/r/aws.json",
            dir.path().join("missing").join("reddit_output_aws.txt"),
        );
        let fetcher = MockFetcher::with_posts(&[("A", "http://a")]);

        let err = run_with_fetcher(
            fetcher.clone(),
            &target,
            &TaskOptions::default(),
            &FetchContext::background(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TaskError::FileOpen { .. }), "got {:?}", err);
        assert_eq!(err.kind(), "FileOpenError");
        assert_eq!(fetcher.save_count().await, 0);
    }

    #[tokio::test]
    async fn test_existing_file_is_overwritten_in_place() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir, "kubernetes");
        std::fs::write(target.destination(), "old content that is longer than new").unwrap();

        let fetcher = MockFetcher::with_posts(&[("New", "http://n")]);
        run_with_fetcher(
            fetcher,
            &target,
            &TaskOptions::default(),
            &FetchContext::background(),
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(target.destination()).unwrap();
        assert!(content.starts_with("New\nhttp://n\n\n"));
        assert!(content.len() > "New\nhttp://n\n\n".len());
    }

    #[tokio::test]
    async fn test_truncate_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir, "kubernetes");
        std::fs::write(target.destination(), "old content that is longer than new").unwrap();

        let options = TaskOptions {
            truncate: true,
            ..TaskOptions::default()
        };
        let fetcher = MockFetcher::with_posts(&[("New", "http://n")]);
        run_with_fetcher(fetcher, &target, &options, &FetchContext::background())
            .await
            .unwrap();

        let content = std::fs::read_to_string(target.destination()).unwrap();
        assert_eq!(content, "New\nhttp://n\n\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_created_file_uses_configured_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = target_in(&dir, "googlecloud");
        let fetcher = MockFetcher::with_posts(&[("A", "http://a")]);

        run_with_fetcher(
            fetcher,
            &target,
            &TaskOptions::default(),
            &FetchContext::background(),
        )
        .await
        .unwrap();

        let mode = std::fs::metadata(target.destination())
            .unwrap()
            .permissions()
            .mode();
        // Owner bits survive any sane umask.
        assert_eq!(mode & 0o700, 0o700);
    }

    #[tokio::test]
    async fn test_run_target_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r/golang.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::listing_body(&[("Go 1.99", "https://go.dev")])),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = Target::new(
            "golang",
            format!("{}/r/golang.json", server.uri()),
            dir.path().join("reddit_output_golang.txt"),
        );
        let options = TaskOptions {
            fetch: FetchSettings {
                timeout: Duration::from_secs(3),
                ..FetchSettings::default()
            },
            ..TaskOptions::default()
        };

        let report = run_target(&target, &options, &FetchContext::background())
            .await
            .unwrap();

        assert_eq!(report.posts_written, 1);
        assert_eq!(
            std::fs::read_to_string(target.destination()).unwrap(),
            "Go 1.99\nhttps://go.dev\n\n"
        );
    }
}
