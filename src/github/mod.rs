//! Access to the commit status and pull request endpoints of the GitHub REST API.

use crate::errors::SizeResult;
use serde::{Deserialize, Serialize};

mod client;
pub use client::GitHubClient;

/// The subset of the GitHub REST API needed to read and publish size statuses.
pub trait StatusApi {
    /// Fetches the metadata of pull request `number` in the repository `slug` (`owner/name`).
    async fn pull_request(&self, slug: &str, number: u64) -> SizeResult<PullRequestInfo>;

    /// Fetches the statuses at `url`, in the order the API returns them.
    async fn statuses(&self, url: &str) -> SizeResult<Vec<CommitStatus>>;

    /// Publishes `status` to the statuses `url`.
    async fn post_status(&self, url: &str, status: &CommitStatus) -> SizeResult<()>;
}

/// The state of a commit status.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Success,
    Failure,
    Pending,
    Error,
}

/// A status attached to a commit.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CommitStatus {
    pub state: StatusState,
    /// Identifies which check this status belongs to. For size statuses, the artifact path.
    pub context: String,
    /// GitHub allows statuses without a description.
    pub description: Option<String>,
}

impl CommitStatus {
    /// Creates a new `success` status for `context`.
    pub fn success(context: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            state: StatusState::Success,
            context: context.into(),
            description: Some(description.into()),
        }
    }
}

/// The parts of a pull request needed to find its base size and publish a new one.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PullRequestInfo {
    /// The SHA of the base commit.
    pub base_sha: String,
    /// Statuses URL of the base repository, with a `{sha}` placeholder.
    pub base_statuses_url_template: String,
    /// Statuses URL of the pull request's head commit.
    pub statuses_url: String,
}

/// Wire shape of `GET /repos/{slug}/pulls/{n}`.
#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    base: BaseRef,
    statuses_url: String,
}

#[derive(Debug, Deserialize)]
struct BaseRef {
    sha: String,
    repo: BaseRepository,
}

#[derive(Debug, Deserialize)]
struct BaseRepository {
    statuses_url: String,
}

impl From<PullRequestResponse> for PullRequestInfo {
    fn from(value: PullRequestResponse) -> Self {
        Self {
            base_sha: value.base.sha,
            base_statuses_url_template: value.base.repo.statuses_url,
            statuses_url: value.statuses_url,
        }
    }
}
