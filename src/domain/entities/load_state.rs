//! Observable state of the authenticated image loader.

use super::image_ref::{ImageReference, LocalImageUrl};
use crate::domain::errors::LoadError;

/// How the most recent load cycle ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadOutcome {
    /// No reference is set.
    #[default]
    NoReference,
    /// A fetch for the current reference is in flight.
    Pending,
    /// The reference was already a local URL and is shown as-is.
    PassThrough,
    /// Bytes were downloaded and bound to a local URL.
    Loaded,
    /// The cycle failed; the display falls back to "no image".
    Failed(LoadError),
}

impl LoadOutcome {
    /// Returns true once the cycle has finished, successfully or not.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the outcome produced a displayable URL.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        matches!(self, Self::PassThrough | Self::Loaded)
    }
}

/// Snapshot published by the loader after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AvatarImageState {
    /// Reference currently requested.
    pub reference: Option<ImageReference>,
    /// URL to display, or `None` for "no image".
    pub display: Option<LocalImageUrl>,
    /// Outcome of the current cycle.
    pub outcome: LoadOutcome,
}

impl AvatarImageState {
    /// Returns true if the current cycle is finished.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.outcome.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_are_settled_without_image() {
        let outcome = LoadOutcome::Failed(LoadError::NotFound);
        assert!(outcome.is_settled());
        assert!(!outcome.has_image());
        assert!(!LoadOutcome::Pending.is_settled());
    }
}
