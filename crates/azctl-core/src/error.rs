//! Unified error handling for azctl-core
//!
//! Wraps API client errors and adds the failure modes that only exist at
//! the workflow layer: poll timeouts, quota exhaustion, and multi-step
//! deletes that stopped half way.
//!
//! # Example
//!
//! ```rust
//! use azctl_core::{CoreError, Result};
//! use azctl_api::ApiError;
//!
//! fn handle_error(err: CoreError) {
//!     if err.is_not_found() {
//!         println!("Resource not found");
//!     } else if err.is_retryable() {
//!         println!("Temporary error, can retry");
//!     }
//! }
//!
//! // API errors are automatically converted
//! let api_err = ApiError::NotFound { message: "pool not found".to_string() };
//! let core_err: CoreError = api_err.into();
//! assert!(core_err.is_not_found());
//! ```

use std::time::Duration;
use thiserror::Error;

/// Core error type wrapping client errors plus workflow failures
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error from one of the API clients
    #[error("API error: {0}")]
    Api(#[from] azctl_api::ApiError),

    /// Pool never reached the steady state within the poll budget
    #[error("Pool '{pool_id}' did not reach steady state within {timeout:?}")]
    PoolTimeout { pool_id: String, timeout: Duration },

    /// Creating another account in the region would exceed its quota
    #[error(
        "Region '{region}' already has {in_use} of {quota} allowed Batch accounts"
    )]
    QuotaExceeded {
        region: String,
        quota: i64,
        in_use: i64,
    },

    /// A multi-step delete removed the account but left the paired
    /// storage account behind
    #[error(
        "Deleted Batch account '{account}' but failed to delete storage account '{storage}': {source}"
    )]
    PartialDelete {
        account: String,
        storage: String,
        #[source]
        source: azctl_api::ApiError,
    },

    /// Named resource does not exist in the listing that was searched
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (e.g., rejected input before any call is made)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if this is a "not found" error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_not_found(),
            CoreError::NotFound(_) => true,
            _ => false,
        }
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Returns true if this is a timeout, either transport-level or a poll
    /// budget that ran out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_timeout(),
            CoreError::PoolTimeout { .. } => true,
            _ => false,
        }
    }

    /// Returns true if retrying the whole operation could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_not_found_converts() {
        let err: CoreError = azctl_api::ApiError::NotFound {
            message: "gone".to_string(),
        }
        .into();
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
    }

    #[test]
    fn pool_timeout_is_timeout_but_not_retryable() {
        let err = CoreError::PoolTimeout {
            pool_id: "render".to_string(),
            timeout: Duration::from_secs(300),
        };
        assert!(err.is_timeout());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("render"));
    }

    #[test]
    fn quota_error_names_the_region() {
        let err = CoreError::QuotaExceeded {
            region: "westus".to_string(),
            quota: 3,
            in_use: 3,
        };
        assert!(err.to_string().contains("westus"));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn partial_delete_keeps_the_cause() {
        let err = CoreError::PartialDelete {
            account: "acct".to_string(),
            storage: "stg".to_string(),
            source: azctl_api::ApiError::ServerError {
                message: "boom".to_string(),
            },
        };
        assert!(err.to_string().contains("stg"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
