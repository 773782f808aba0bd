//! The CLI for `size-status`.

use crate::{
    constants::{
        DEFAULT_API_URL, ENV_API_URL, ENV_CI, ENV_COMMIT, ENV_PULL_REQUEST, ENV_REPO_SLUG,
        ENV_TOKEN, NOT_A_PULL_REQUEST,
    },
    ctx::RunContext,
    github::GitHubClient,
    reporter::Reporter,
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{
    builder::styling::{AnsiColor, Color, Style},
    ArgAction, Parser,
};
use std::path::PathBuf;
use tracing::{info, warn, Level};

const ABOUT: &str =
    "size-status tracks the size of a build artifact across commits with GitHub commit statuses.";

/// The CLI application for `size-status`.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
#[command(about = ABOUT, version, styles = cli_styles())]
pub struct Cli {
    /// Verbosity level (0-4)
    #[arg(short, action = ArgAction::Count)]
    pub v: u8,
    /// Path to the artifact whose size is tracked
    pub artifact: PathBuf,
    /// Set when running in CI; without it the run is a no-op
    #[arg(long, env = ENV_CI)]
    pub ci: Option<String>,
    /// The commit being built
    #[arg(long, env = ENV_COMMIT)]
    pub commit: Option<String>,
    /// The pull request being built, or `false`
    #[arg(long, env = ENV_PULL_REQUEST)]
    pub pull_request: Option<String>,
    /// The repository, as `owner/name`
    #[arg(long, env = ENV_REPO_SLUG)]
    pub repo_slug: Option<String>,
    /// Token used to read and post commit statuses
    #[arg(long, env = ENV_TOKEN, hide_env_values = true)]
    pub token: Option<String>,
    /// Root of the GitHub REST API
    #[arg(long, env = ENV_API_URL, default_value = DEFAULT_API_URL)]
    pub api_url: String,
    /// Compute the status without posting it
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Run the CLI application with the given arguments.
    pub async fn run(self) -> Result<()> {
        let Some((ctx, token)) = self.into_context()? else {
            return Ok(());
        };

        let client = GitHubClient::new(&ctx.api_url, token)?;
        let report = Reporter::new(&ctx, &client).run().await?;
        info!(
            "Reported {} bytes (previous: {:?}) to {}",
            report.current, report.previous, report.target
        );

        Ok(())
    }

    /// Builds the [RunContext] and API token for this run.
    ///
    /// ## Returns
    /// - `Ok(Some(_))` - Everything needed to run is present.
    /// - `Ok(None)` - The run is not applicable here, e.g. outside of CI or without a token.
    /// - `Err(_)` - An input is present but invalid.
    pub(crate) fn into_context(self) -> Result<Option<(RunContext, String)>> {
        let Some(token) = non_empty(self.token) else {
            warn!("{ENV_TOKEN} is not set; exiting.");
            return Ok(None);
        };
        if non_empty(self.ci).is_none() {
            warn!("Not running in CI; exiting.");
            return Ok(None);
        }
        let Some(commit) = non_empty(self.commit) else {
            warn!("{ENV_COMMIT} is not set; exiting.");
            return Ok(None);
        };
        let Some(repo_slug) = non_empty(self.repo_slug) else {
            warn!("{ENV_REPO_SLUG} is not set; exiting.");
            return Ok(None);
        };

        if !is_repo_slug(&repo_slug) {
            bail!("Repository slug `{repo_slug}` is not of the form `owner/name`.");
        }
        let pull_request = parse_pull_request(self.pull_request.as_deref())?;
        info!("{ENV_PULL_REQUEST}: {pull_request:?}");

        let ctx = RunContext {
            artifact: self.artifact,
            commit,
            repo_slug,
            pull_request,
            api_url: self.api_url.trim_end_matches('/').to_string(),
            dry_run: self.dry_run,
        };
        Ok(Some((ctx, token)))
    }

    /// Initializes the tracing subscriber
    ///
    /// # Returns
    /// - `Result<()>` - Ok if successful, Err otherwise.
    pub(crate) fn init_tracing_subscriber(self) -> Result<Self> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(match self.v {
                0 => Level::ERROR,
                1 => Level::WARN,
                2 => Level::INFO,
                3 => Level::DEBUG,
                _ => Level::TRACE,
            })
            .finish();

        tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))?;

        Ok(self)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn is_repo_slug(slug: &str) -> bool {
    matches!(slug.split_once('/'), Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/'))
}

/// Parses the pull request number. Unset, empty, and `false` all mean "not a pull request".
fn parse_pull_request(value: Option<&str>) -> Result<Option<u64>> {
    match value {
        None | Some("") | Some(NOT_A_PULL_REQUEST) => Ok(None),
        Some(number) => number
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid pull request number `{number}`")),
    }
}

/// Styles for the CLI application.
const fn cli_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}
