//! Error types for The Odds API client.

use thiserror::Error;

/// Errors that can occur when interacting with The Odds API.
#[derive(Debug, Error)]
pub enum OddsApiError {
    /// No API key was configured.
    #[error("missing API key (set ODDS_API_KEY or EDGE_ODDS_API__API_KEY)")]
    MissingApiKey,

    /// API request failed.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message from API.
        message: String,
    },

    /// Monthly request quota exhausted or burst limit hit.
    #[error("rate limit exceeded")]
    RateLimit,

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl OddsApiError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Returns true for statuses meaning "no odds for this sport right now".
    ///
    /// 400, 404 and 422 are returned for unknown, inactive or
    /// outright-less sport keys.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status_code: 400 | 404 | 422,
                ..
            }
        )
    }

    /// Returns true if the error indicates the request should be retried later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit => true,
            Self::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for OddsApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OddsApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Odds API operations.
pub type Result<T> = std::result::Result<T, OddsApiError>;
