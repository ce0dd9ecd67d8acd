use crate::domain::entities::ImageReference;

/// Turns an image reference into an absolute, fetchable URL.
pub trait PathResolver: Send + Sync {
    /// Returns `None` when the reference cannot be resolved.
    fn resolve(&self, reference: &ImageReference) -> Option<String>;
}
