//! Error type shared by every client in this crate.
//!
//! Non-2xx responses are classified into typed variants by status code so
//! callers can branch on *what went wrong* instead of parsing message
//! strings. Helper methods (`is_not_found`, `is_retryable`, ...) exist for
//! the common checks.

use serde::Deserialize;
use thiserror::Error;

/// Error type for Azure plane operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// Token acquisition against the identity provider failed
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// 400 - malformed request
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// 401 - bearer token rejected
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// 403 - authenticated but not permitted
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// 404 - resource absent. Distinct from an empty listing.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// 409 - resource already exists or is in a conflicting state
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// 429 - service throttling
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// 5xx - service-side failure
    #[error("Server error: {message}")]
    ServerError { message: String },

    /// Any other non-2xx status
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    /// Transport-level failure (DNS, TLS, connect, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Client builder misconfiguration
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Azure error envelope: `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[allow(dead_code)]
    code: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Classify a non-2xx response into a typed error.
    ///
    /// Extracts the service's error message from the standard envelope when
    /// present, falling back to the raw body.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|e| e.error)
            .and_then(|d| d.message)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.to_string()
                }
            });

        match status.as_u16() {
            400 => ApiError::BadRequest { message },
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            409 => ApiError::Conflict { message },
            429 => ApiError::RateLimited { message },
            500..=599 => ApiError::ServerError { message },
            code => ApiError::Api { code, message },
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. }
                | ApiError::Forbidden { .. }
                | ApiError::AuthenticationFailed { .. }
        )
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::ServerError { .. })
    }

    /// Returns true if this is a transport-level timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::RequestFailed(e) if e.is_timeout())
    }

    /// Returns true if this is a rate limiting error (429)
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// Returns true if this is a conflict error (409)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }

    /// Returns true if this is a bad request error (400)
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ApiError::BadRequest { .. })
    }

    /// Returns true if this error is potentially retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::ServerError { .. }
            | ApiError::RateLimited { .. }
            | ApiError::ConnectionError(_) => true,
            ApiError::RequestFailed(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
