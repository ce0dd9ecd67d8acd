//! Image reference and local object URL value objects.

use std::fmt;

use sha2::{Digest, Sha256};

/// Scheme prefix of URLs minted by an object URL registry.
pub const LOCAL_URL_SCHEME: &str = "blob:";

/// Opaque path naming a stored avatar image on the API server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference(String);

impl ImageReference {
    /// Creates a reference from a path, rejecting blank input.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let path = path.into().trim().to_string();
        if path.is_empty() {
            return None;
        }
        Some(Self(path))
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the reference is already a local object URL.
    #[must_use]
    pub fn is_local_object_url(&self) -> bool {
        self.0.starts_with(LOCAL_URL_SCHEME)
    }

    /// Short stable digest of the reference, safe to put in logs.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hex::encode(&hasher.finalize()[..8])
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Browser-style local URL bound to bytes held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalImageUrl(String);

impl LocalImageUrl {
    /// Wraps an already-minted local URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&ImageReference> for LocalImageUrl {
    fn from(reference: &ImageReference) -> Self {
        Self(reference.as_str().to_string())
    }
}

impl fmt::Display for LocalImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
