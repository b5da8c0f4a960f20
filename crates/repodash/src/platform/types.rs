use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::Result;

/// Snapshot of a user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    /// Platform-specific numeric ID.
    pub id: u64,
    /// Login handle.
    pub login: String,
    /// Display name (if set).
    pub name: Option<String>,
    /// Public email (if set).
    pub email: Option<String>,
    /// Profile bio (if set).
    pub bio: Option<String>,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Number of public repositories.
    pub public_repos: u64,
    /// Number of followers.
    pub followers: u64,
    /// Number of accounts this user follows.
    pub following: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Whether this profile's login matches `username`, ignoring case.
    #[must_use]
    pub fn matches_login(&self, username: &str) -> bool {
        self.login.to_lowercase() == username.to_lowercase()
    }
}

/// A repository as seen by the authenticated token.
///
/// Every field except `is_owner` is a read-only projection of the remote
/// payload at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRecord {
    /// Platform-specific numeric ID. Unique across an aggregated list.
    pub id: u64,
    pub name: String,
    /// Full name in `owner/name` form.
    pub full_name: String,
    pub description: Option<String>,
    /// Web URL.
    pub html_url: String,
    /// HTTPS clone URL.
    pub clone_url: String,
    /// SSH clone URL.
    pub ssh_url: String,
    /// Primary language.
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    /// Size in KB.
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub private: bool,
    pub fork: bool,
    pub archived: bool,
    pub disabled: bool,
    /// Ownership relative to a target username.
    ///
    /// `None` until the aggregator tags the record; never read from upstream.
    pub is_owner: Option<bool>,
}

impl RepositoryRecord {
    /// The owner segment of `full_name` (text before the first `/`).
    #[must_use]
    pub fn owner(&self) -> &str {
        owner_segment(&self.full_name)
    }

    /// Whether `username` owns this repository, ignoring case on both sides.
    #[must_use]
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner().to_lowercase() == username.to_lowercase()
    }

    /// Return the record with `is_owner` derived for `username`.
    #[must_use]
    pub fn with_ownership(mut self, username: &str) -> Self {
        self.is_owner = Some(self.is_owned_by(username));
        self
    }
}

/// Owner segment of an `owner/name` full name.
///
/// A name without a separator is treated as all owner.
#[inline]
#[must_use]
pub fn owner_segment(full_name: &str) -> &str {
    full_name.split('/').next().unwrap_or(full_name)
}

/// One batch of records from a single listing call.
///
/// An empty page signals the end of pagination.
pub type Page = Vec<RepositoryRecord>;

/// Operations a repository-hosting platform exposes to the aggregator.
///
/// Implementations are constructed once per token and hold no per-call
/// state. They never retry: a failed call is returned to the caller as-is.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Fetch a user's profile by login.
    async fn fetch_user(&self, username: &str) -> Result<UserProfile>;

    /// Fetch the profile of the user the token belongs to.
    async fn fetch_authenticated_user(&self) -> Result<UserProfile>;

    /// Fetch one page of repositories owned by `username`, most recently
    /// updated first. Pages past the end are empty.
    async fn fetch_repositories_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page>;

    /// Fetch one page of every repository visible to the token (owned,
    /// collaborator and organization member), most recently updated first.
    /// Pages past the end are empty.
    async fn fetch_visible_repositories_page(&self, page: u32, per_page: u32) -> Result<Page>;

    /// Fetch a single repository.
    async fn fetch_repository(&self, owner: &str, name: &str) -> Result<RepositoryRecord>;

    /// Permanently delete a repository. Irreversible.
    async fn delete_repository(&self, owner: &str, name: &str) -> Result<()>;
}
