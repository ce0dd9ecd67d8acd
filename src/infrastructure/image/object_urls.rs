//! In-memory object URL registry.

use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::trace;
use uuid::Uuid;

use crate::domain::entities::{LOCAL_URL_SCHEME, LocalImageUrl};
use crate::domain::ports::ObjectUrlRegistry;

const URL_ORIGIN: &str = "gradeflow";

/// Registry backing `blob:` URLs with in-memory buffers.
#[derive(Default)]
pub struct InMemoryObjectUrlRegistry {
    entries: Mutex<HashMap<LocalImageUrl, (Bytes, String)>>,
}

impl InMemoryObjectUrlRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes pinned by live URLs.
    #[must_use]
    pub fn live_bytes(&self) -> usize {
        self.entries.lock().values().map(|(b, _)| b.len()).sum()
    }
}

impl std::fmt::Debug for InMemoryObjectUrlRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectUrlRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

impl ObjectUrlRegistry for InMemoryObjectUrlRegistry {
    fn create(&self, bytes: Bytes, media_type: &str) -> LocalImageUrl {
        let url = LocalImageUrl::new(format!("{LOCAL_URL_SCHEME}{URL_ORIGIN}/{}", Uuid::new_v4()));
        trace!(url = %url, len = bytes.len(), "Created object URL");
        self.entries
            .lock()
            .insert(url.clone(), (bytes, media_type.to_string()));
        url
    }

    fn revoke(&self, url: &LocalImageUrl) {
        if self.entries.lock().remove(url).is_some() {
            trace!(url = %url, "Revoked object URL");
        }
    }

    fn lookup(&self, url: &LocalImageUrl) -> Option<(Bytes, String)> {
        self.entries.lock().get(url).cloned()
    }

    fn live_count(&self) -> usize {
        self.entries.lock().len()
    }
}
