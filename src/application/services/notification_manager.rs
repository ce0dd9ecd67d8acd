use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::ports::NotificationPort;
use crate::domain::{Notification, NotificationLevel};

/// Oldest toasts are dropped beyond this many.
pub const MAX_QUEUED_TOASTS: usize = 32;

/// Thread-safe toast queue usable as a [`NotificationPort`].
///
/// Toasts expire `ttl` after they were sent, whether or not anyone looked.
#[derive(Debug)]
pub struct ToastQueue {
    queue: Mutex<VecDeque<Notification>>,
    ttl: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl ToastQueue {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            ttl,
        }
    }

    /// Drops toasts that have expired by `now`.
    pub fn prune_at(&self, now: Instant) {
        self.queue.lock().retain(|n| !n.is_expired_at(now));
    }

    /// Oldest toast that is still live.
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.prune_at(Instant::now());
        self.queue.lock().front().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes and returns every queued toast, expired or not.
    pub fn drain(&self) -> Vec<Notification> {
        self.queue.lock().drain(..).collect()
    }
}

impl NotificationPort for ToastQueue {
    fn send(&self, level: NotificationLevel, title: &str, body: &str) {
        debug!(%level, title, "Toast queued");
        let mut queue = self.queue.lock();
        if queue.len() == MAX_QUEUED_TOASTS {
            queue.pop_front();
        }
        queue.push_back(Notification::new(level, title, body, self.ttl));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_come_out_in_order() {
        let queue = ToastQueue::default();
        queue.send(NotificationLevel::Warn, "Unsupported file", "text/plain");
        queue.send(NotificationLevel::Success, "Avatar updated", "");

        assert_eq!(queue.current().unwrap().title, "Unsupported file");

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].level, NotificationLevel::Success);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_expired_toasts_are_pruned() {
        let queue = ToastQueue::new(Duration::from_secs(3));
        let port: &dyn NotificationPort = &queue;
        port.send(NotificationLevel::Error, "Upload failed", "HTTP 500");

        queue.prune_at(Instant::now() + Duration::from_secs(1));
        assert_eq!(queue.len(), 1);

        queue.prune_at(Instant::now() + Duration::from_secs(10));
        assert!(queue.current().is_none());
    }

    #[test]
    fn test_queue_is_bounded() {
        let queue = ToastQueue::default();
        for i in 0..=MAX_QUEUED_TOASTS {
            queue.send(NotificationLevel::Info, &format!("toast {i}"), "");
        }

        assert_eq!(queue.len(), MAX_QUEUED_TOASTS);
        assert_eq!(queue.drain()[0].title, "toast 1");
    }
}
