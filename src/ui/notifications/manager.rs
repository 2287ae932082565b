// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! The `Manager` handles queuing, display timing, and dismissal of notifications.
//! It limits the number of visible toasts and manages auto-dismiss timers.

use crate::application::port::NotificationSink;
use crate::config::DEFAULT_TOAST_SECS;
use crate::domain::notification::{Notification, NotificationId, Severity};
use std::collections::VecDeque;
use std::time::Duration;

/// Maximum number of notifications visible at once.
const MAX_VISIBLE: usize = 3;

/// Manages the notification queue and visible notifications.
#[derive(Debug)]
pub struct Manager {
    /// Currently visible notifications (oldest first).
    visible: VecDeque<Notification>,
    /// Queued notifications waiting to be displayed.
    queue: VecDeque<Notification>,
    /// Display time of success, info and warning toasts.
    toast_duration: Duration,
}

impl Default for Manager {
    fn default() -> Self {
        Self::with_toast_duration(Duration::from_secs(DEFAULT_TOAST_SECS))
    }
}

impl Manager {
    /// Creates a new empty notification manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_toast_duration(toast_duration: Duration) -> Self {
        Self {
            visible: VecDeque::new(),
            queue: VecDeque::new(),
            toast_duration,
        }
    }

    #[must_use]
    pub fn toast_duration(&self) -> Duration {
        self.toast_duration
    }

    /// Pushes a new notification to be displayed.
    ///
    /// If fewer than `MAX_VISIBLE` notifications are showing, it's displayed
    /// immediately. Otherwise, it's added to the queue and shown when space
    /// becomes available.
    pub fn push(&mut self, notification: Notification) {
        if self.visible.len() < MAX_VISIBLE {
            self.visible.push_back(notification);
        } else {
            self.queue.push_back(notification);
        }
    }

    /// Dismisses a notification by its ID.
    ///
    /// Returns `true` if the notification was found and removed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(pos) = self.visible.iter().position(|n| n.id() == id) {
            self.visible.remove(pos);
            self.promote_from_queue();
            return true;
        }

        if let Some(pos) = self.queue.iter().position(|n| n.id() == id) {
            self.queue.remove(pos);
            return true;
        }

        false
    }

    /// Processes a tick event, dismissing any notifications that have expired.
    ///
    /// Should be called periodically (e.g., every 100-500ms) to handle auto-dismiss.
    pub fn tick(&mut self) {
        let to_dismiss: Vec<NotificationId> = self
            .visible
            .iter()
            .filter(|n| self.should_auto_dismiss(n))
            .map(Notification::id)
            .collect();

        for id in to_dismiss {
            self.dismiss(id);
        }
    }

    /// Errors stay until dismissed.
    fn should_auto_dismiss(&self, notification: &Notification) -> bool {
        notification.severity() != Severity::Error
            && notification.is_expired(self.toast_duration)
    }

    /// Returns the currently visible notifications.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether there are any notifications (visible or queued).
    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.visible.is_empty() || !self.queue.is_empty()
    }

    /// Removes every notification, visible ones first, in arrival order.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.visible.drain(..).chain(self.queue.drain(..)).collect()
    }

    /// Promotes a notification from the queue to visible if there's space.
    fn promote_from_queue(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            if let Some(notification) = self.queue.pop_front() {
                self.visible.push_back(notification);
            } else {
                break;
            }
        }
    }
}

impl NotificationSink for Manager {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
