// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! Notifications appear temporarily to inform users about the outcome of
//! remote operations (upload done, filter failed, etc.) without blocking
//! interaction.
//!
//! # Components
//!
//! - [`manager`] - `Manager` for queuing and lifecycle management
//! - [`toast`] - Text rendering of a single notification
//!
//! # Usage
//!
//! ```ignore
//! use gallery_lens::ui::notifications::{Manager, Toast};
//!
//! let mut manager = Manager::with_toast_duration(config.notifications.toast_duration());
//! let mut session = Session::new(api, urls, manager);
//! session.fetch_gallery().await?;
//! for notification in session.notifications_mut().drain() {
//!     println!("{}", Toast::line(&notification, &i18n));
//! }
//! ```
//!
//! # Design Considerations
//!
//! - Toast duration: configurable, 3s by default; errors stay until dismissed
//! - Max visible toasts: 3 (others are queued)

mod manager;
mod toast;

pub use crate::domain::notification::{Notification, NotificationId, Severity};
pub use manager::Manager;
pub use toast::Toast;
