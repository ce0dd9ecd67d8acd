//! Credential storage error types.

use thiserror::Error;

/// Credential storage error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum CredentialError {
    #[error("failed to access secure storage: {0}")]
    AccessFailed(String),

    #[error("failed to retrieve credential: {0}")]
    RetrievalFailed(String),

    #[error("failed to store credential: {0}")]
    StorageFailed(String),

    #[error("failed to delete credential: {0}")]
    DeletionFailed(String),

    #[error("invalid token format: {0}")]
    InvalidFormat(String),
}
