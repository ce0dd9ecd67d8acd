use crate::domain::NotificationLevel;

/// Port for user-visible transient notifications.
pub trait NotificationPort: Send + Sync {
    /// Shows a notification.
    fn send(&self, level: NotificationLevel, title: &str, body: &str);
}
