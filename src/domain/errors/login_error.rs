//! Sign-in error types.

use thiserror::Error;

use super::{ApiError, CredentialError};

/// Failures while signing in with a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum LoginError {
    #[error("invalid token format: {message}")]
    InvalidFormat { message: String },

    #[error("token was not accepted: {0}")]
    Rejected(#[source] ApiError),

    #[error(transparent)]
    Storage(#[from] CredentialError),
}

impl LoginError {
    /// Creates invalid format error.
    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Returns whether the server refused the token itself.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(ApiError::Unauthorized))
    }
}
