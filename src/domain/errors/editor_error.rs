//! Avatar editor error types.

use thiserror::Error;

use super::ApiError;

/// Failures surfaced by the crop/zoom editor.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum EditorError {
    #[error("selected file is not an image ({media_type})")]
    NotAnImage { media_type: String },

    #[error("could not decode image: {message}")]
    Decode { message: String },

    #[error("could not render avatar: {message}")]
    Encode { message: String },

    #[error("no image is being edited")]
    NoDraft,

    #[error("upload failed: {0}")]
    Upload(#[source] ApiError),

    #[error("removing avatar failed: {0}")]
    Remove(#[source] ApiError),
}

impl EditorError {
    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates encode error.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Returns whether the draft survives this error.
    #[must_use]
    pub const fn keeps_draft(&self) -> bool {
        matches!(self, Self::Encode { .. } | Self::Upload(_))
    }

    /// Message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Upload(e) | Self::Remove(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}
