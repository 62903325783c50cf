//! GitHub REST API client for collaborator and issue operations

use crate::error::{Error, Result};
use crate::traits::CollaboratorApi;
use crate::types::{CollaboratorCheck, Permission};
use reqwest::{Response, StatusCode};
use serde_json::json;
use std::time::Duration;

/// Default public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("collabgate/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// GitHub API client bound to one access token
pub struct GitHubApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubApiClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Runtime(format!("failed to build HTTP client: {}", e)))?;

        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(Error::Config("GitHub token must not be empty".to_string()));
        }

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Create from `GITHUB_API_URL` and `GITHUB_TOKEN`
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let token = std::env::var("GITHUB_TOKEN")
            .map_err(|_| Error::Config("GITHUB_TOKEN not set".to_string()))?;
        Self::new(base_url, token)
    }

    /// API base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(&self.token)
    }

    async fn send(&self, operation: &str, request: reqwest::RequestBuilder) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| Error::Http(format!("{} request failed: {}", operation, e.without_url())))
    }
}

/// Turn a non-success response into an error.
///
/// 403/429 with an exhausted rate-limit budget map to
/// [`Error::RateLimitExceeded`]; everything else to [`Error::Http`].
async fn error_for_status(operation: &str, response: Response) -> Error {
    let status = response.status();
    let remaining = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && (remaining.as_deref() == Some("0") || status == StatusCode::TOO_MANY_REQUESTS)
    {
        return Error::RateLimitExceeded(format!(
            "GitHub API rate limit exceeded during {}. Remaining: {}",
            operation,
            remaining.as_deref().unwrap_or("0")
        ));
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or(body);

    Error::Http(format!(
        "{} returned {}: {}",
        operation,
        status,
        truncate_chars(&message, 300)
    ))
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl CollaboratorApi for GitHubApiClient {
    /// `GET /repos/{owner}/{repo}/collaborators/{username}`
    async fn check_collaborator<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        username: &'a str,
    ) -> Result<CollaboratorCheck> {
        const OP: &str = "check collaborator";
        let path = format!("/repos/{}/{}/collaborators/{}", owner, repo, username);
        let response = self.send(OP, self.request(reqwest::Method::GET, &path)).await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(CollaboratorCheck::MemberConfirmed),
            StatusCode::NOT_FOUND => Ok(CollaboratorCheck::NotFound),
            status if status.is_success() => Err(Error::Http(format!(
                "{} returned unexpected status {}",
                OP, status
            ))),
            _ => Err(error_for_status(OP, response).await),
        }
    }

    /// `PUT /repos/{owner}/{repo}/collaborators/{username}`
    ///
    /// 201 (invitation created) and 204 (already a member) are both success.
    async fn add_collaborator<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        username: &'a str,
        permission: Permission,
    ) -> Result<()> {
        const OP: &str = "add collaborator";
        let path = format!("/repos/{}/{}/collaborators/{}", owner, repo, username);
        let request = self
            .request(reqwest::Method::PUT, &path)
            .json(&json!({ "permission": permission.as_str() }));
        let response = self.send(OP, request).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_for_status(OP, response).await)
        }
    }

    /// `POST /repos/{owner}/{repo}/issues/{issue_number}/comments`
    async fn create_comment<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        issue_number: u64,
        body: &'a str,
    ) -> Result<()> {
        const OP: &str = "create comment";
        let path = format!("/repos/{}/{}/issues/{}/comments", owner, repo, issue_number);
        let request = self
            .request(reqwest::Method::POST, &path)
            .json(&json!({ "body": body }));
        let response = self.send(OP, request).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_for_status(OP, response).await)
        }
    }

    /// `POST /repos/{owner}/{repo}/issues/{issue_number}/labels`
    async fn add_labels<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        issue_number: u64,
        labels: &'a [&'a str],
    ) -> Result<()> {
        const OP: &str = "add labels";
        let path = format!("/repos/{}/{}/issues/{}/labels", owner, repo, issue_number);
        let request = self
            .request(reqwest::Method::POST, &path)
            .json(&json!({ "labels": labels }));
        let response = self.send(OP, request).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_for_status(OP, response).await)
        }
    }

    /// `PATCH /repos/{owner}/{repo}/issues/{issue_number}`
    async fn close_issue<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        issue_number: u64,
    ) -> Result<()> {
        const OP: &str = "close issue";
        let path = format!("/repos/{}/{}/issues/{}", owner, repo, issue_number);
        let request = self
            .request(reqwest::Method::PATCH, &path)
            .json(&json!({ "state": "closed" }));
        let response = self.send(OP, request).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_for_status(OP, response).await)
        }
    }
}
