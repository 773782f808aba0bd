//! Constants for the `size-status` application.

pub(crate) const DEFAULT_API_URL: &str = "https://api.github.com";
pub(crate) const USER_AGENT: &str = concat!("size-status/", env!("CARGO_PKG_VERSION"));
pub(crate) const GITHUB_ACCEPT: &str = "application/vnd.github+json";

pub(crate) const ENV_CI: &str = "TRAVIS";
pub(crate) const ENV_COMMIT: &str = "TRAVIS_COMMIT";
pub(crate) const ENV_PULL_REQUEST: &str = "TRAVIS_PULL_REQUEST";
pub(crate) const ENV_REPO_SLUG: &str = "TRAVIS_REPO_SLUG";
pub(crate) const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub(crate) const ENV_API_URL: &str = "GITHUB_API_URL";

/// Value of [ENV_PULL_REQUEST] on builds that are not for a pull request.
pub(crate) const NOT_A_PULL_REQUEST: &str = "false";

/// Placeholder substituted with a commit SHA in statuses URL templates.
pub(crate) const SHA_PLACEHOLDER: &str = "{sha}";

pub(crate) const BYTES_SUFFIX: &str = " bytes";
