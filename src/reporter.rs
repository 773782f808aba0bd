//! Measures the tracked artifact and publishes its size as a commit status.

use crate::{
    ctx::RunContext,
    description,
    errors::{SizeError, SizeResult},
    github::{CommitStatus, StatusApi},
    resolver::resolve_baseline,
};
use nu_ansi_term::Color;
use tracing::debug;

/// The outcome of a run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Report {
    pub current: u64,
    pub previous: Option<u64>,
    /// The statuses URL the status was (or, on a dry run, would have been) posted to.
    pub target: String,
    pub status: CommitStatus,
}

/// Measures the artifact, compares it with the base size, and publishes the result.
pub struct Reporter<'a, A> {
    ctx: &'a RunContext,
    api: &'a A,
}

impl<'a, A: StatusApi> Reporter<'a, A> {
    /// Creates a new [Reporter] for the given [RunContext].
    pub fn new(ctx: &'a RunContext, api: &'a A) -> Self {
        Self { ctx, api }
    }

    /// Runs the report end to end. The status is posted once, after everything else succeeded.
    pub async fn run(&self) -> SizeResult<Report> {
        let current = self.measure().await?;
        let context = self.ctx.status_context();

        let baseline = resolve_baseline(
            self.api,
            &self.ctx.repo_slug,
            self.ctx.pull_request,
            &context,
        )
        .await?;

        println!("Current: {}", Color::Green.paint(current.to_string()));
        println!(
            "Previous: {}",
            Color::Yellow.paint(
                baseline
                    .size
                    .map_or_else(|| "unknown".to_string(), |s| s.to_string())
            )
        );

        // Pull request builds publish to the statuses of the push build's commit.
        let target = match &baseline.pull_request {
            Some(pr) => pr.statuses_url.clone(),
            None => self.ctx.commit_statuses_url(),
        };
        let status = CommitStatus::success(context, description::encode(current, baseline.size));

        let report = Report {
            current,
            previous: baseline.size,
            target,
            status,
        };

        if self.ctx.dry_run {
            println!(
                "Dry run; not posting `{}` to {}",
                Color::Cyan.paint(report.status.description.as_deref().unwrap_or_default()),
                Color::Blue.paint(&report.target)
            );
            return Ok(report);
        }

        println!("POSTing to {}", Color::Blue.paint(&report.target));
        self.api.post_status(&report.target, &report.status).await?;
        println!(
            "Posted `{}` for {}",
            Color::Cyan.paint(report.status.description.as_deref().unwrap_or_default()),
            report.status.context
        );

        Ok(report)
    }

    /// Returns the size of the artifact, in bytes.
    async fn measure(&self) -> SizeResult<u64> {
        let metadata = tokio::fs::metadata(&self.ctx.artifact)
            .await
            .map_err(|source| SizeError::Io {
                path: self.ctx.artifact.clone(),
                source,
            })?;
        debug!("{} is {} bytes", self.ctx.artifact.display(), metadata.len());
        Ok(metadata.len())
    }
}

#[cfg(test)]
mod test {
    use super::Reporter;
    use crate::{
        ctx::{test::context, RunContext},
        errors::SizeError,
        github::{test::FakeApi, CommitStatus, PullRequestInfo, StatusState},
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASE_STATUSES: &str = "https://api.github.com/repos/owner/repo/statuses/basesha";
    const PUSH_STATUSES: &str = "https://api.github.com/repos/owner/repo/statuses/pushsha";

    fn artifact(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![0u8; len]).unwrap();
        file.flush().unwrap();
        file
    }

    fn run_context(file: &NamedTempFile, pull_request: Option<u64>) -> RunContext {
        let mut ctx = context("", pull_request);
        ctx.artifact = file.path().to_path_buf();
        ctx
    }

    fn pull_request() -> PullRequestInfo {
        PullRequestInfo {
            base_sha: "basesha".to_string(),
            base_statuses_url_template: "https://api.github.com/repos/owner/repo/statuses/{sha}"
                .to_string(),
            statuses_url: PUSH_STATUSES.to_string(),
        }
    }

    #[tokio::test]
    async fn pull_request_reports_delta_to_push_statuses() {
        let file = artifact(500_000);
        let ctx = run_context(&file, Some(3));
        let context = ctx.status_context();
        let api = FakeApi::default()
            .with_pull_request("owner/repo", 3, pull_request())
            .with_statuses(
                BASE_STATUSES,
                vec![CommitStatus::success(context.clone(), "480,000 bytes")],
            );

        let report = Reporter::new(&ctx, &api).run().await.unwrap();

        assert_eq!(report.current, 500_000);
        assert_eq!(report.previous, Some(480_000));
        assert_eq!(
            api.posted(),
            vec![(
                PUSH_STATUSES.to_string(),
                CommitStatus {
                    state: StatusState::Success,
                    context,
                    description: Some("+20,000 bytes (+4.00%) --> 500,000 bytes".to_string()),
                }
            )]
        );
    }

    #[tokio::test]
    async fn push_build_reports_absolute_size_to_commit() {
        let file = artifact(1_234);
        let ctx = run_context(&file, None);
        let api = FakeApi::default();

        Reporter::new(&ctx, &api).run().await.unwrap();

        let posted = api.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(
            posted[0].0,
            "https://api.github.com/repos/owner/repo/statuses/headsha"
        );
        assert_eq!(posted[0].1.description.as_deref(), Some("1,234 bytes"));
        assert_eq!(api.requests().len(), 1);
    }

    #[tokio::test]
    async fn pull_request_without_base_status_reports_absolute_size() {
        let file = artifact(64);
        let ctx = run_context(&file, Some(3));
        let api = FakeApi::default().with_pull_request("owner/repo", 3, pull_request());

        let report = Reporter::new(&ctx, &api).run().await.unwrap();

        assert_eq!(report.previous, None);
        assert_eq!(report.target, PUSH_STATUSES);
        assert_eq!(api.posted()[0].1.description.as_deref(), Some("64 bytes"));
    }

    #[tokio::test]
    async fn contract_violation_publishes_nothing() {
        let file = artifact(64);
        let ctx = run_context(&file, Some(3));
        let mut pr = pull_request();
        pr.base_statuses_url_template = "https://api.github.com/repos/owner/repo/statuses".to_string();
        let api = FakeApi::default().with_pull_request("owner/repo", 3, pr);

        let err = Reporter::new(&ctx, &api).run().await.unwrap_err();

        assert!(matches!(err, SizeError::ContractViolation { .. }));
        assert!(api.posted().is_empty());
    }

    #[tokio::test]
    async fn failed_base_lookup_publishes_nothing() {
        let file = artifact(64);
        let ctx = run_context(&file, Some(3));
        let api = FakeApi::default()
            .with_pull_request("owner/repo", 3, pull_request())
            .failing(BASE_STATUSES);

        let err = Reporter::new(&ctx, &api).run().await.unwrap_err();

        assert!(matches!(err, SizeError::Api { status: 500, .. }));
        assert!(api.posted().is_empty());
    }

    #[tokio::test]
    async fn dry_run_does_not_post() {
        let file = artifact(10);
        let mut ctx = run_context(&file, None);
        ctx.dry_run = true;
        let api = FakeApi::default();

        let report = Reporter::new(&ctx, &api).run().await.unwrap();

        assert_eq!(report.status.description.as_deref(), Some("10 bytes"));
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn unreadable_artifact_is_fatal() {
        let ctx = context("does/not/exist.js", None);
        let api = FakeApi::default();

        let err = Reporter::new(&ctx, &api).run().await.unwrap_err();

        assert!(matches!(err, SizeError::Io { .. }));
        assert!(api.requests().is_empty());
    }
}
