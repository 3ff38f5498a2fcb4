//! Error types for the Gamma API client.

use thiserror::Error;

/// Errors that can occur when fetching from the Gamma API.
#[derive(Debug, Error)]
pub enum GammaError {
    /// API returned a non-success status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body.
        message: String,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Response body could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A market was decoded but cannot become a record.
    #[error("invalid market {id}: {reason}")]
    InvalidMarket {
        /// Market identifier, or "?" when absent.
        id: String,
        /// Why the market was rejected.
        reason: String,
    },
}

impl GammaError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates an invalid market error.
    pub fn invalid_market(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMarket {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if retrying later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Api { status_code, .. } => *status_code == 429 || *status_code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GammaError {
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

impl From<serde_json::Error> for GammaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Gamma operations.
pub type Result<T> = std::result::Result<T, GammaError>;
