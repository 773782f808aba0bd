//! Resolution of the size previously recorded for a pull request's base commit.

use crate::{
    constants::SHA_PLACEHOLDER,
    description,
    errors::{SizeError, SizeResult},
    github::{PullRequestInfo, StatusApi},
};
use tracing::{info, warn};

/// What is known about the base of the current build.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Baseline {
    /// The pull request being built, if any.
    pub pull_request: Option<PullRequestInfo>,
    /// The size recorded on the pull request's base commit, if any.
    pub size: Option<u64>,
}

/// Resolves the size recorded for `context` on the base commit of `pull_request`.
///
/// A build that is not for a pull request, or a base commit without a status for `context`, has
/// no baseline. Any failed request, an unexpected statuses URL, or an unparsable description is
/// fatal.
///
/// ## Takes
/// - `api` - The API to query.
/// - `slug` - The repository, as `owner/name`.
/// - `pull_request` - The pull request being built, if any.
/// - `context` - The status context of the tracked artifact.
pub async fn resolve_baseline(
    api: &impl StatusApi,
    slug: &str,
    pull_request: Option<u64>,
    context: &str,
) -> SizeResult<Baseline> {
    let Some(number) = pull_request else {
        info!("Not a pull request build; no base size.");
        return Ok(Baseline::default());
    };

    let pr = api.pull_request(slug, number).await?;
    let url = base_statuses_url(&pr)?;
    info!("Base SHA {}, statuses at {}", pr.base_sha, url);

    let statuses = api.statuses(&url).await?;
    let Some(status) = statuses.into_iter().find(|s| s.context == context) else {
        warn!("Unable to find status `{context}` for base at {url}");
        return Ok(Baseline {
            pull_request: Some(pr),
            size: None,
        });
    };

    let description = status.description.unwrap_or_default();
    let size = description::decode(&description)?;

    Ok(Baseline {
        pull_request: Some(pr),
        size: Some(size),
    })
}

/// Substitutes the base SHA into the base repository's statuses URL template.
fn base_statuses_url(pr: &PullRequestInfo) -> SizeResult<String> {
    let url = pr
        .base_statuses_url_template
        .replace(SHA_PLACEHOLDER, &pr.base_sha);

    if !url.contains(&pr.base_sha) {
        return Err(SizeError::ContractViolation {
            sha: pr.base_sha.clone(),
            url,
        });
    }

    Ok(url)
}
