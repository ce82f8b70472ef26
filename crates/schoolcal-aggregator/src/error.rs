//! Aggregator error types.
//!
//! Source failures and malformed rows never surface here; they are
//! recovered inside an aggregation pass. Only refusing the caller and bad
//! configuration are errors.

use thiserror::Error;

use crate::auth::Role;

/// Result type for aggregator operations.
pub type AggregatorResult<T> = Result<T, AggregatorError>;

/// Errors that can occur in the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregatorError {
    /// The request carries no valid session.
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// The caller is signed in but lacks the required role.
    #[error("Forbidden: {role} role required")]
    Forbidden { role: Role },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl AggregatorError {
    /// Creates an unauthorized error.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(role: Role) -> Self {
        Self::Forbidden { role }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if the request was refused by the authorization gate.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Forbidden { .. })
    }
}
