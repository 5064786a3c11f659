//! Notification timing and dismissal policy.
//!
//! Only one notification is visible at a time. Showing a new one replaces the
//! current message and restarts the timer; it hides on its own after
//! [`DEFAULT_NOTIFICATION_TIMEOUT`] unless dismissed earlier. Click-away
//! dismissals are ignored so stray clicks on the background do not clear it.

use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(4000);

/// Why a notification is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Auto-hide timer elapsed.
    Timeout,
    /// Click landed outside the notification.
    ClickAway,
    /// Explicit close button.
    User,
}

impl CloseReason {
    /// Whether this reason hides the notification.
    pub const fn dismisses(self) -> bool {
        !matches!(self, Self::ClickAway)
    }
}

/// Tracks when the visible notification appeared.
#[derive(Debug, Clone)]
pub struct NotificationClock {
    timeout: Duration,
    shown_at: Option<Instant>,
}

impl NotificationClock {
    /// Clock with the given auto-hide timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            shown_at: None,
        }
    }

    /// Auto-hide timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// (Re)starts the timer at `now`.
    pub fn start(&mut self, now: Instant) {
        self.shown_at = Some(now);
    }

    /// Stops the timer.
    pub fn stop(&mut self) {
        self.shown_at = None;
    }

    /// Whether a timer is running.
    pub fn is_running(&self) -> bool {
        self.shown_at.is_some()
    }

    /// Time left before auto-hide, `None` when not running.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.shown_at
            .map(|at| self.timeout.saturating_sub(now.saturating_duration_since(at)))
    }

    /// Whether the running timer has elapsed at `now`.
    pub fn expired(&self, now: Instant) -> bool {
        self.remaining(now).is_some_and(|left| left.is_zero())
    }
}

impl Default for NotificationClock {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TIMEOUT)
    }
}
