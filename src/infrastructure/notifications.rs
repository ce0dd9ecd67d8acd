//! Desktop notifications.

use notify_rust::Notification;

use crate::domain::NotificationLevel;
use crate::domain::ports::NotificationPort;

/// Desktop notification service.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotificationService {
    enabled: bool,
}

impl DesktopNotificationService {
    /// Creates the service; a disabled one drops every notification.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl NotificationPort for DesktopNotificationService {
    fn send(&self, level: NotificationLevel, title: &str, body: &str) {
        if !self.enabled {
            return;
        }

        let summary = format!("{title} ({level})");
        let body = body.to_string();

        tokio::task::spawn_blocking(move || {
            if let Err(e) = Notification::new()
                .summary(&summary)
                .body(&body)
                .appname("GradeFlow")
                .show()
            {
                tracing::warn!("Failed to show notification: {}", e);
            }
        });
    }
}
