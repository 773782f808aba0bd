//! [StatusApi] over HTTP, backed by [reqwest].

use super::{CommitStatus, PullRequestInfo, PullRequestResponse, StatusApi};
use crate::{
    constants::{GITHUB_ACCEPT, USER_AGENT},
    errors::{SizeError, SizeResult},
};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// An authenticated GitHub REST API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// Creates a new [GitHubClient] for the API rooted at `api_url`, authenticating with `token`.
    pub fn new(api_url: &str, token: String) -> SizeResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(GITHUB_ACCEPT));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SizeResult<T> {
        debug!("GET {url}");
        let response = self.send(url, self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Sends an authenticated request, failing on any status code outside of `200..=299`.
    async fn send(&self, url: &str, request: RequestBuilder) -> SizeResult<Response> {
        let response = request.bearer_auth(&self.token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Request for {url} failed: {status}\n{body}");
            return Err(SizeError::Api {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

impl StatusApi for GitHubClient {
    async fn pull_request(&self, slug: &str, number: u64) -> SizeResult<PullRequestInfo> {
        let url = format!("{}/repos/{}/pulls/{}", self.api_url, slug, number);
        let pr: PullRequestResponse = self.get_json(&url).await?;
        Ok(pr.into())
    }

    async fn statuses(&self, url: &str) -> SizeResult<Vec<CommitStatus>> {
        self.get_json(url).await
    }

    async fn post_status(&self, url: &str, status: &CommitStatus) -> SizeResult<()> {
        debug!("POST {url}");
        self.send(url, self.http.post(url).json(status)).await?;
        Ok(())
    }
}
