//! Authenticated dashboard session.
//!
//! A [`Session`] owns one [`Identity`], the adapter built for it, and the
//! most recently loaded profile and repository list. State is only replaced
//! after a fully successful load, so a failed refresh leaves the previous
//! view intact.

use std::fmt;

use thiserror::Error;

use crate::aggregate::{
    AggregateOptions, AggregationError, RepositoryBreakdown, get_all_user_repositories_with,
};
use crate::platform::{ApiError, RepositoryRecord, RepositorySource, UserProfile, owner_segment};

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Both a token and a username are required")]
    MissingCredentials,

    /// The token authenticates a different account than the one claimed.
    #[error("Token belongs to '{actual}', not '{claimed}'")]
    OwnershipMismatch { claimed: String, actual: String },

    #[error("Repository {0} is not part of this session")]
    UnknownRepository(u64),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

impl SessionError {
    /// HTTP status of the underlying failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Api(e) => e.status,
            SessionError::Aggregation(e) => e.status(),
            _ => None,
        }
    }
}

/// A bearer token together with the username it is claimed to belong to.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    token: String,
    username: String,
}

impl Identity {
    /// Build an identity from raw input. Surrounding whitespace is dropped.
    pub fn new(token: impl AsRef<str>, username: impl AsRef<str>) -> Result<Self, SessionError> {
        let token = token.as_ref().trim();
        let username = username.as_ref().trim();
        if token.is_empty() || username.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        Ok(Self {
            token: token.to_string(),
            username: username.to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

/// In-memory dashboard state for one identity.
pub struct Session<S> {
    identity: Identity,
    source: S,
    options: AggregateOptions,
    profile: Option<UserProfile>,
    repositories: Vec<RepositoryRecord>,
}

impl<S: RepositorySource> Session<S> {
    pub fn new(identity: Identity, source: S) -> Self {
        Self {
            identity,
            source,
            options: AggregateOptions::default(),
            profile: None,
            repositories: Vec::new(),
        }
    }

    /// Override the pagination settings used by [`load`](Self::load).
    #[must_use]
    pub fn with_options(mut self, options: AggregateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Profile from the last successful load.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Repositories from the last successful load, minus local deletions.
    pub fn repositories(&self) -> &[RepositoryRecord] {
        &self.repositories
    }

    pub fn breakdown(&self) -> RepositoryBreakdown {
        RepositoryBreakdown::from_records(&self.repositories)
    }

    pub fn find_repository(&self, id: u64) -> Option<&RepositoryRecord> {
        self.repositories.iter().find(|repo| repo.id == id)
    }

    /// Look up a loaded repository by `owner/name`, ignoring case.
    pub fn find_by_full_name(&self, full_name: &str) -> Option<&RepositoryRecord> {
        self.repositories
            .iter()
            .find(|repo| repo.full_name.eq_ignore_ascii_case(full_name))
    }

    /// Check that the token belongs to the claimed username.
    pub async fn validate(&self) -> Result<UserProfile, SessionError> {
        let actual = self.source.fetch_authenticated_user().await?;
        if !actual.matches_login(self.identity.username()) {
            tracing::warn!(
                claimed = self.identity.username(),
                actual = %actual.login,
                "Token does not belong to claimed user"
            );
            return Err(SessionError::OwnershipMismatch {
                claimed: self.identity.username().to_string(),
                actual: actual.login,
            });
        }
        Ok(actual)
    }

    /// Fetch the profile and the aggregated repository list concurrently.
    ///
    /// Both replace the current state only if both succeed.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        let username = self.identity.username();
        let source = &self.source;
        let options = &self.options;

        let (profile, repositories) = tokio::try_join!(
            async { source.fetch_user(username).await.map_err(SessionError::from) },
            async {
                get_all_user_repositories_with(source, username, options)
                    .await
                    .map_err(SessionError::from)
            },
        )?;

        tracing::debug!(
            username,
            public_repos = profile.public_repos,
            repositories = repositories.len(),
            "Session loaded"
        );

        self.profile = Some(profile);
        self.repositories = repositories;
        Ok(())
    }

    /// Reload everything. Same semantics as [`load`](Self::load).
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        self.load().await
    }

    /// Fetch current details for a single repository.
    pub async fn fetch_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryRecord, SessionError> {
        Ok(self.source.fetch_repository(owner, name).await?)
    }

    /// Delete a loaded repository remotely, then drop it locally.
    ///
    /// Local state is untouched when the remote call fails.
    pub async fn delete_repository(&mut self, id: u64) -> Result<RepositoryRecord, SessionError> {
        let (owner, name) = {
            let repo = self
                .find_repository(id)
                .ok_or(SessionError::UnknownRepository(id))?;
            (owner_segment(&repo.full_name).to_string(), repo.name.clone())
        };

        self.source.delete_repository(&owner, &name).await?;
        tracing::info!(id, owner = %owner, name = %name, "Deleted repository");

        self.remove_repository(id)
            .ok_or(SessionError::UnknownRepository(id))
    }

    /// Drop exactly the record with `id` and decrement the profile's
    /// repository count. Unknown ids are a no-op.
    pub fn remove_repository(&mut self, id: u64) -> Option<RepositoryRecord> {
        let index = self.repositories.iter().position(|repo| repo.id == id)?;
        let removed = self.repositories.remove(index);
        if let Some(profile) = self.profile.as_mut() {
            profile.public_repos = profile.public_repos.saturating_sub(1);
        }
        Some(removed)
    }

    /// End the session, discarding the identity and all loaded state.
    pub fn logout(self) {
        tracing::debug!(username = self.identity.username(), "Session ended");
    }
}
