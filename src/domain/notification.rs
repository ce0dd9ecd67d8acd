use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warn,
    Error,
}

impl NotificationLevel {
    /// Whether the user should look at this even if nothing else is shown.
    #[must_use]
    pub const fn is_problem(self) -> bool {
        matches!(self, Self::Warn | Self::Error)
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warn => "warning",
            Self::Error => "error",
        })
    }
}

/// A toast shown after an avatar action.
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    #[must_use]
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            created_at: Instant::now(),
            ttl,
        }
    }

    /// True once `ttl` has passed since creation, as seen at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }

    /// One-line rendering: `title` or `title: message`.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.message.is_empty() {
            self.title.clone()
        } else {
            format!("{}: {}", self.title, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_measured_from_creation() {
        let n = Notification::new(
            NotificationLevel::Success,
            "Avatar updated",
            "",
            Duration::from_secs(5),
        );

        assert!(!n.is_expired_at(n.created_at + Duration::from_secs(4)));
        assert!(n.is_expired_at(n.created_at + Duration::from_secs(5)));
    }

    #[test]
    fn test_summary() {
        let ttl = Duration::from_secs(1);
        let bare = Notification::new(NotificationLevel::Success, "Avatar removed", "", ttl);
        let full = Notification::new(NotificationLevel::Error, "Upload failed", "HTTP 413", ttl);

        assert_eq!(bare.summary(), "Avatar removed");
        assert_eq!(full.summary(), "Upload failed: HTTP 413");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(NotificationLevel::Warn.to_string(), "warning");
        assert!(NotificationLevel::Warn.is_problem());
        assert!(!NotificationLevel::Success.is_problem());
    }
}
