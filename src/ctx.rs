//! The run context of the `size-status` application.

use std::path::PathBuf;

/// Everything a single run needs to know about its environment, gathered once at start-up.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RunContext {
    /// The artifact whose size is tracked. Its path doubles as the status context.
    pub artifact: PathBuf,
    /// The commit being built.
    pub commit: String,
    /// The repository, as `owner/name`.
    pub repo_slug: String,
    /// The pull request being built, if any.
    pub pull_request: Option<u64>,
    /// Root of the REST API, without a trailing slash.
    pub api_url: String,
    /// Resolve and encode the size, but don't publish it.
    pub dry_run: bool,
}

impl RunContext {
    /// The status context for the tracked artifact.
    pub fn status_context(&self) -> String {
        self.artifact.display().to_string()
    }

    /// The statuses URL of the commit being built.
    pub fn commit_statuses_url(&self) -> String {
        format!(
            "{}/repos/{}/statuses/{}",
            self.api_url, self.repo_slug, self.commit
        )
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::RunContext;

    pub(crate) fn context(artifact: &str, pull_request: Option<u64>) -> RunContext {
        RunContext {
            artifact: artifact.into(),
            commit: "headsha".to_string(),
            repo_slug: "owner/repo".to_string(),
            pull_request,
            api_url: "https://api.github.com".to_string(),
            dry_run: false,
        }
    }

    #[test]
    fn commit_statuses_url() {
        let ctx = context("dist/app.js", None);
        assert_eq!(
            ctx.commit_statuses_url(),
            "https://api.github.com/repos/owner/repo/statuses/headsha"
        );
        assert_eq!(ctx.status_context(), "dist/app.js");
    }
}
