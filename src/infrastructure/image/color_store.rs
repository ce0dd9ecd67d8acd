//! Bounded in-memory store for placeholder avatar colors.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::domain::entities::AvatarColor;
use crate::domain::ports::AvatarColorStore;

/// Default number of remembered colors.
pub const DEFAULT_COLOR_CAPACITY: usize = 256;

/// LRU-bounded color memo.
pub struct LruColorStore {
    cache: Mutex<LruCache<String, AvatarColor>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LruColorStore {
    /// Creates a store with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns `(hits, misses)`.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    /// Number of remembered colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remembered colors, most recently used first. Does not touch recency.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, AvatarColor)> {
        self.cache
            .lock()
            .iter()
            .map(|(key, color)| (key.clone(), *color))
            .collect()
    }

    /// Creates a store preloaded with `entries`, given most recently used first.
    #[must_use]
    pub fn with_entries(capacity: usize, entries: Vec<(String, AvatarColor)>) -> Self {
        let store = Self::new(capacity);
        {
            let mut cache = store.cache.lock();
            for (key, color) in entries.into_iter().rev() {
                cache.put(key, color);
            }
        }
        store
    }
}

impl Default for LruColorStore {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_CAPACITY)
    }
}

impl AvatarColorStore for LruColorStore {
    fn get(&self, key: &str) -> Option<AvatarColor> {
        let color = self.cache.lock().get(key).copied();
        if color.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key, "Color store hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        color
    }

    fn put(&self, key: &str, color: AvatarColor) {
        self.cache.lock().put(key.to_string(), color);
    }
}
