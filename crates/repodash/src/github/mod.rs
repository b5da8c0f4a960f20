//! GitHub REST API adapter.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Wire payloads, decoded strictly
//! - [`client`] - Client creation and request plumbing
//! - [`convert`] - Model conversion to repodash records
//!
//! The client implements [`RepositorySource`](crate::platform::RepositorySource),
//! so it plugs straight into the aggregator and the session:
//!
//! ```ignore
//! use repodash::aggregate::get_all_user_repositories;
//! use repodash::github::GitHubClient;
//!
//! let client = GitHubClient::new(&token)?;
//! let repos = get_all_user_repositories(&client, "octocat").await?;
//! ```

mod client;
mod convert;
mod error;
mod types;

pub use client::{GITHUB_API_URL, GitHubClient, parse_rate_limit_headers};
pub use convert::{to_repository_record, to_user_profile};
pub use error::GitHubError;
pub use types::{GitHubErrorBody, GitHubRepo, GitHubUser, RateLimitInfo};
