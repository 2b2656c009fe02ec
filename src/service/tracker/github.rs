//! GitHub REST implementation of the issue tracker.
//!
//! Every call is a single request with a fixed timeout and no retries.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::base::{
    config::Config,
    types::{Issue, Res},
};

use super::{GenericIssueTracker, TrackerClient, TrackerError, TrackerResult};

const USER_AGENT: &str = concat!("issue-triage/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

// Extra methods on `TrackerClient` applied by the GitHub implementation.

impl TrackerClient {
    /// Creates a new GitHub tracker client.
    pub fn github(config: &Config) -> Res<Self> {
        let client = GitHubTracker::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<GitHubTracker> for TrackerClient {
    fn from(client: GitHubTracker) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Wire types.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct Contributor {
    #[serde(default)]
    login: Option<String>,
}

// Structs.

/// GitHub issue tracker scoped to one repository.
#[derive(Clone)]
pub struct GitHubTracker {
    client: Client,
    api_url: String,
    repository: String,
}

impl GitHubTracker {
    /// Create a new GitHub tracker from the configuration.
    #[instrument(name = "GitHubTracker::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.github_token))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            repository: config.github_repository.clone(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.repository, path)
    }

    /// Send a request and turn any non-success status into an error.
    async fn send(&self, request: RequestBuilder) -> TrackerResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(TrackerError::from_status(status.as_u16()));
        }

        Ok(response)
    }
}

#[async_trait]
impl GenericIssueTracker for GitHubTracker {
    #[instrument(skip(self))]
    async fn search_issues(&self, query: &str) -> TrackerResult<Vec<Issue>> {
        let request = self.client.get(format!("{}/search/issues", self.api_url)).query(&[("q", query)]);
        let response: SearchResponse = self.send(request).await?.json().await?;

        debug!("Search returned {} item(s).", response.items.len());

        Ok(response.items)
    }

    #[instrument(skip(self))]
    async fn list_contributors(&self) -> TrackerResult<Vec<String>> {
        let request = self.client.get(self.repo_url("contributors"));
        let contributors: Vec<Contributor> = self.send(request).await?.json().await?;

        Ok(contributors.into_iter().filter_map(|c| c.login).filter(|login| !login.is_empty()).collect())
    }

    #[instrument(skip(self))]
    async fn is_assignable(&self, issue_number: u64, login: &str) -> TrackerResult<bool> {
        let response = self.client.get(self.repo_url(&format!("issues/{issue_number}/assignees/{login}"))).send().await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(TrackerError::from_status(status.as_u16())),
        }
    }

    #[instrument(skip(self))]
    async fn close_issue(&self, issue_number: u64) -> TrackerResult<()> {
        let request = self.client.patch(self.repo_url(&format!("issues/{issue_number}"))).json(&json!({ "state": "closed" }));
        self.send(request).await?;

        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn comment_issue(&self, issue_number: u64, body: &str) -> TrackerResult<()> {
        let request = self.client.post(self.repo_url(&format!("issues/{issue_number}/comments"))).json(&json!({ "body": body }));
        self.send(request).await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_assignees(&self, issue_number: u64, assignees: &[String]) -> TrackerResult<()> {
        let request = self.client.post(self.repo_url(&format!("issues/{issue_number}/assignees"))).json(&json!({ "assignees": assignees }));
        self.send(request).await?;

        Ok(())
    }
}
