// SPDX-License-Identifier: MPL-2.0
//! Text rendering of individual notifications.
//!
//! A toast is one line: a severity tag followed by the localized message.

use crate::domain::notification::Notification;
use crate::i18n::fluent::I18n;

/// Toast renderer.
pub struct Toast;

impl Toast {
    /// Localized message of `notification`, with its arguments interpolated.
    #[must_use]
    pub fn message(notification: &Notification, i18n: &I18n) -> String {
        i18n.tr_with_args(notification.message_key(), notification.message_args())
    }

    /// `[severity] message`, as printed by the command line front-end.
    #[must_use]
    pub fn line(notification: &Notification, i18n: &I18n) -> String {
        format!(
            "[{}] {}",
            notification.severity().label(),
            Self::message(notification, i18n)
        )
    }
}
