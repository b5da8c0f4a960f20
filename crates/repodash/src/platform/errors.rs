use thiserror::Error;

/// Error returned by every adapter operation.
///
/// `message` carries the operation context followed by the upstream error
/// text. `status` is the HTTP status when the failure came from a response,
/// and `None` for transport-level failures (DNS, TLS, timeouts).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    /// Create an error for an HTTP response with the given status.
    #[inline]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create an error for a failure that never produced a response.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// Rate limited responses come back as 429, or 403 with an exhausted quota.
    #[inline]
    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(429)
            || (self.status == Some(403) && self.message.contains("Rate limit exceeded"))
    }
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, ApiError>;
