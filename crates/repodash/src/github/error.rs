//! GitHub API error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::http::HttpError;
use crate::platform::ApiError;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Rate limit exhausted.
    #[error("Rate limit exceeded. Resets at {reset_at}: {message}")]
    RateLimited {
        status: u16,
        reset_at: DateTime<Utc>,
        message: String,
    },

    /// Invalid client configuration (bad API URL).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GitHubError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Api { status, .. } | GitHubError::RateLimited { status, .. } => {
                Some(*status)
            }
            GitHubError::Http(_) | GitHubError::Json(_) | GitHubError::Config(_) => None,
        }
    }

    /// Convert to the adapter error, prefixing the operation context.
    pub fn into_api_error(self, context: &str) -> ApiError {
        let message = format!("{context}: {self}");
        match self.status() {
            Some(status) => ApiError::new(status, message),
            None => ApiError::transport(message),
        }
    }
}
