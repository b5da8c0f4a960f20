//! GitHub API client creation and request plumbing.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use super::convert::{to_repository_record, to_user_profile};
use super::error::GitHubError;
use super::types::{GitHubErrorBody, GitHubRepo, GitHubUser, RateLimitInfo};
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::platform::{self, Page, RepositoryRecord, RepositorySource, UserProfile};

/// Public GitHub API root.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// REST API version sent with every request.
const API_VERSION: &str = "2022-11-28";

/// Per-request timeout for the default transport.
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Extract rate limit info from GitHub response headers.
pub fn parse_rate_limit_headers(headers: &Headers) -> Option<RateLimitInfo> {
    let limit = headers
        .get("x-ratelimit-limit")?
        .parse::<usize>()
        .ok()?;
    let remaining = headers
        .get("x-ratelimit-remaining")?
        .parse::<usize>()
        .ok()?;
    let reset_epoch = headers
        .get("x-ratelimit-reset")?
        .parse::<i64>()
        .ok()?;
    let reset_at =
        chrono::DateTime::from_timestamp(reset_epoch, 0).unwrap_or_else(chrono::Utc::now);
    Some(RateLimitInfo {
        limit,
        remaining,
        reset_at,
    })
}

/// GitHub API client implementing [`RepositorySource`].
///
/// Holds the token and transport for its whole life and nothing else, so a
/// clone can be shared freely between concurrent calls.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    token: Arc<String>,
}

impl GitHubClient {
    /// Create a client for api.github.com.
    pub fn new(token: &str) -> Result<Self, GitHubError> {
        Self::with_base_url(GITHUB_API_URL, token)
    }

    /// Create a client for a specific API root.
    ///
    /// GitHub Enterprise Server exposes the API under `https://<host>/api/v3`.
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self, GitHubError> {
        let transport = ReqwestTransport::with_timeout(REQUEST_TIMEOUT)
            .map_err(|e| GitHubError::Config(e.to_string()))?;
        Self::new_with_transport(base_url, token, Arc::new(transport))
    }

    pub fn new_with_transport(
        base_url: &str,
        token: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, GitHubError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| GitHubError::Config(format!("invalid API URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GitHubError::Config(format!(
                "API URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            transport,
            base_url,
            token: Arc::new(token.to_string()),
        })
    }

    /// Get the API root this client talks to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL from raw path segments.
    ///
    /// Segments are percent-encoded, so owner and repository names can be
    /// passed through unchanged.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url.into()
    }

    fn page_query(page: u32, per_page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ]
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "repodash")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("Authorization", format!("Bearer {}", self.token.as_str()))
    }

    /// Send an authenticated request, turning non-2xx responses into errors.
    async fn send(&self, method: HttpMethod, url: String) -> Result<HttpResponse, GitHubError> {
        tracing::debug!(method = method.as_str(), url = %url, "GitHub request");

        let response = self.transport.send(self.request(method, url)).await?;

        if response.is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(&response))
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: String) -> Result<T, GitHubError> {
        let response = self.send(HttpMethod::Get, url).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    fn error_from_response(response: &HttpResponse) -> GitHubError {
        let status = response.status;

        let message = match serde_json::from_slice::<GitHubErrorBody>(&response.body) {
            Ok(body) => body.message,
            Err(_) => response.text(),
        };
        let message = if message.is_empty() {
            format!("HTTP {status}")
        } else {
            message
        };

        if matches!(status, 403 | 429)
            && let Some(info) = parse_rate_limit_headers(&response.headers)
            && info.remaining == 0
        {
            tracing::warn!(
                status,
                limit = info.limit,
                reset_at = %info.reset_at,
                "GitHub rate limit exhausted"
            );
            return GitHubError::RateLimited {
                status,
                reset_at: info.reset_at,
                message,
            };
        }

        GitHubError::Api { status, message }
    }

    /// `GET /users/{username}`.
    pub async fn get_user(&self, username: &str) -> Result<UserProfile, GitHubError> {
        let user: GitHubUser = self.get(self.endpoint(&["users", username], &[])).await?;
        Ok(to_user_profile(user))
    }

    /// `GET /user`.
    pub async fn get_authenticated_user(&self) -> Result<UserProfile, GitHubError> {
        let user: GitHubUser = self.get(self.endpoint(&["user"], &[])).await?;
        Ok(to_user_profile(user))
    }

    /// `GET /users/{username}/repos`, most recently updated first.
    pub async fn list_user_repos_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page, GitHubError> {
        let url = self.endpoint(
            &["users", username, "repos"],
            &Self::page_query(page, per_page),
        );
        let repos: Vec<GitHubRepo> = self.get(url).await?;
        Ok(repos.into_iter().map(to_repository_record).collect())
    }

    /// `GET /user/repos`, most recently updated first.
    ///
    /// Covers owned, collaborator and organization-member repositories,
    /// including private ones the token can see.
    pub async fn list_visible_repos_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Page, GitHubError> {
        let url = self.endpoint(&["user", "repos"], &Self::page_query(page, per_page));
        let repos: Vec<GitHubRepo> = self.get(url).await?;
        Ok(repos.into_iter().map(to_repository_record).collect())
    }

    /// `GET /repos/{owner}/{name}`.
    pub async fn get_repo(&self, owner: &str, name: &str) -> Result<RepositoryRecord, GitHubError> {
        let repo: GitHubRepo = self.get(self.endpoint(&["repos", owner, name], &[])).await?;
        Ok(to_repository_record(repo))
    }

    /// `DELETE /repos/{owner}/{name}`. Expects 204 No Content.
    pub async fn delete_repo(&self, owner: &str, name: &str) -> Result<(), GitHubError> {
        let response = self
            .send(HttpMethod::Delete, self.endpoint(&["repos", owner, name], &[]))
            .await?;
        tracing::debug!(owner, name, status = response.status, "Repository deleted");
        Ok(())
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn fetch_user(&self, username: &str) -> platform::Result<UserProfile> {
        self.get_user(username)
            .await
            .map_err(|e| e.into_api_error("Failed to fetch user"))
    }

    async fn fetch_authenticated_user(&self) -> platform::Result<UserProfile> {
        self.get_authenticated_user()
            .await
            .map_err(|e| e.into_api_error("Failed to fetch authenticated user"))
    }

    async fn fetch_repositories_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> platform::Result<Page> {
        self.list_user_repos_page(username, page, per_page)
            .await
            .map_err(|e| e.into_api_error("Failed to fetch repositories"))
    }

    async fn fetch_visible_repositories_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> platform::Result<Page> {
        self.list_visible_repos_page(page, per_page)
            .await
            .map_err(|e| e.into_api_error("Failed to fetch contributed repositories"))
    }

    async fn fetch_repository(&self, owner: &str, name: &str) -> platform::Result<RepositoryRecord> {
        self.get_repo(owner, name)
            .await
            .map_err(|e| e.into_api_error("Failed to fetch repository"))
    }

    async fn delete_repository(&self, owner: &str, name: &str) -> platform::Result<()> {
        self.delete_repo(owner, name)
            .await
            .map_err(|e| e.into_api_error("Failed to delete repository"))
    }
}
