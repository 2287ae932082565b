// SPDX-License-Identifier: MPL-2.0
//! Notification port definition.

use crate::domain::notification::Notification;

/// Receiver of user-facing notifications (toasts, log lines, ...).
pub trait NotificationSink {
    /// Delivers one notification.
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
