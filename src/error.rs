//! Riftwatch error types

use std::time::Duration;

/// Riftwatch error types
#[derive(Debug, thiserror::Error)]
pub enum RiftwatchError {
    // Upstream outcomes
    #[error("not found: {0}")]
    NotFound(String),

    /// Local or upstream throttling. Retried; never returned from
    /// [`RiotClient::fetch`](crate::RiotClient::fetch) once retries run out.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// 5xx response or transport failure. Retried like `RateLimited`.
    #[error("upstream error (status {status:?}): {message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("upstream unavailable after {attempts} attempt(s): {last_error}")]
    Unavailable { attempts: u32, last_error: String },

    #[error("authentication failed: invalid or expired API key")]
    AuthenticationFailed,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not enough matches to analyze: {available} of {required} required")]
    InsufficientData { required: usize, available: usize },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("render error: {0}")]
    Render(String),
}

/// Coarse category for surfacing an error to an end user.
///
/// Callers above the client do not retry; they only need to know which
/// message to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upstream confirmed the resource does not exist.
    NotFound,
    /// The upstream could not be reached or kept throttling us.
    Unavailable,
    /// The request itself was rejected (bad key, bad input, too little data).
    Rejected,
    /// Local failure: decoding, configuration, rendering.
    Internal,
}

impl RiftwatchError {
    /// Whether the error is worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Upstream { .. })
    }

    /// Upstream-provided backoff hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::RateLimited { .. } | Self::Upstream { .. } | Self::Unavailable { .. } => {
                ErrorKind::Unavailable
            }
            Self::AuthenticationFailed
            | Self::Api { .. }
            | Self::InvalidInput(_)
            | Self::InsufficientData { .. } => ErrorKind::Rejected,
            Self::Json(_) | Self::Configuration(_) | Self::Render(_) => ErrorKind::Internal,
        }
    }

    /// Map a non-success HTTP status to an error.
    ///
    /// `retry_after` is only consulted for 429.
    pub fn from_status(status: u16, resource: &str, retry_after: Option<Duration>) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed,
            404 => Self::NotFound(resource.to_string()),
            429 => Self::RateLimited { retry_after },
            500..=599 => Self::Upstream {
                status: Some(status),
                message: format!("server error for {resource}"),
            },
            code => Self::Api {
                status: code,
                message: format!("request for {resource} rejected"),
            },
        }
    }
}

impl From<reqwest::Error> for RiftwatchError {
    fn from(err: reqwest::Error) -> Self {
        RiftwatchError::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Result type alias for Riftwatch operations
pub type Result<T> = std::result::Result<T, RiftwatchError>;
