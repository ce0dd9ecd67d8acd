//! Image loader failure classification.

use thiserror::Error;

/// Why a load cycle produced no image.
///
/// Every variant collapses to "no image" for the caller; the distinction
/// only feeds logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum LoadError {
    #[error("image not found")]
    NotFound,

    #[error("image reference could not be resolved to a URL")]
    Unresolvable,

    #[error("no bearer credential available")]
    Unauthenticated,

    #[error("server answered HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("transport failure: {message}")]
    Transport { message: String },
}

impl LoadError {
    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns true for the explicit "no image" answer.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns whether a later attempt could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::HttpStatus { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Failure reported by an image transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    /// Human-readable cause.
    pub message: String,
}

impl TransportError {
    /// Creates transport error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for LoadError {
    fn from(err: TransportError) -> Self {
        Self::Transport {
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(LoadError::transport("reset").is_transient());
        assert!(LoadError::HttpStatus { status: 503 }.is_transient());
        assert!(!LoadError::HttpStatus { status: 403 }.is_transient());
        assert!(!LoadError::NotFound.is_transient());
        assert!(LoadError::NotFound.is_not_found());
    }
}
