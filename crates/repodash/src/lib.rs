//! Repodash - a GitHub repository dashboard core.
//!
//! This library lists every repository a user owns or contributes to,
//! deduplicated and tagged with ownership, and lets the owner inspect and
//! delete them.
//!
//! # Features
//!
//! - `github` (default) - The reqwest-backed GitHub adapter in [`github`].
//!   Without it only the platform model, the aggregator and the session are
//!   built, which is enough to drive them from a custom [`RepositorySource`].
//!
//! # Example
//!
//! ```ignore
//! use repodash::github::GitHubClient;
//! use repodash::session::{Identity, Session};
//!
//! let identity = Identity::new(token, "octocat")?;
//! let client = GitHubClient::new(identity.token())?;
//! let mut session = Session::new(identity, client);
//!
//! session.validate().await?;
//! session.load().await?;
//! println!("{} repositories", session.repositories().len());
//! ```

pub mod aggregate;
pub mod http;
pub mod listing;
pub mod platform;
pub mod session;

#[cfg(feature = "github")]
pub mod github;

pub use aggregate::{
    AggregateOptions, AggregationError, RepositoryBreakdown, get_all_owned_repositories,
    get_all_user_repositories,
};
pub use listing::ListingQuery;
pub use platform::{ApiError, Page, RepositoryRecord, RepositorySource, UserProfile};
pub use session::{Identity, Session, SessionError};
