//! GitHub API wire types.
//!
//! Only the fields the data model needs are declared. Extra upstream fields
//! are ignored; a missing or mistyped required field is a decode error.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `GET /users/{username}` and `GET /user` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository payload shared by the listing and single-repository endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    pub ssh_url: String,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub private: bool,
    pub fork: bool,
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
}

/// Error body GitHub returns with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubErrorBody {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

/// Rate limit state parsed from `x-ratelimit-*` response headers.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Maximum requests allowed per period.
    pub limit: usize,
    /// Remaining requests in current period.
    pub remaining: usize,
    /// When the rate limit resets.
    pub reset_at: DateTime<Utc>,
}
