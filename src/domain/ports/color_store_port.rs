use crate::domain::entities::AvatarColor;

/// Key-value store memoizing placeholder colors per user key.
pub trait AvatarColorStore: Send + Sync {
    /// Returns the remembered color for `key`.
    fn get(&self, key: &str) -> Option<AvatarColor>;

    /// Remembers `color` for `key`.
    fn put(&self, key: &str, color: AvatarColor);
}
