//! Local object URL registry port and its owning guard.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::domain::entities::LocalImageUrl;

/// Binds in-memory bytes to local URLs.
pub trait ObjectUrlRegistry: Send + Sync {
    /// Mints a new URL bound to `bytes`.
    fn create(&self, bytes: Bytes, media_type: &str) -> LocalImageUrl;

    /// Releases a URL. Unknown URLs are ignored.
    fn revoke(&self, url: &LocalImageUrl);

    /// Returns the bytes and media type bound to a live URL.
    fn lookup(&self, url: &LocalImageUrl) -> Option<(Bytes, String)>;

    /// Number of URLs not yet revoked.
    fn live_count(&self) -> usize;
}

/// Sole owner of a local URL; revokes it when dropped.
pub struct OwnedObjectUrl {
    registry: Arc<dyn ObjectUrlRegistry>,
    url: LocalImageUrl,
}

impl OwnedObjectUrl {
    /// Registers `bytes` and takes ownership of the new URL.
    #[must_use]
    pub fn create(registry: Arc<dyn ObjectUrlRegistry>, bytes: Bytes, media_type: &str) -> Self {
        let url = registry.create(bytes, media_type);
        Self { registry, url }
    }

    /// The owned URL.
    #[must_use]
    pub const fn url(&self) -> &LocalImageUrl {
        &self.url
    }
}

impl fmt::Debug for OwnedObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedObjectUrl").field(&self.url).finish()
    }
}

impl Drop for OwnedObjectUrl {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}
