// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! Notifications are emitted by the session for every user-visible outcome
//! of a remote operation. They carry a message key plus named arguments; the
//! presentation layer decides how to render them.

use std::time::{Duration, Instant};

/// Message keys emitted by the session.
pub mod keys {
    pub const GALLERY_LOAD_ERROR: &str = "notification-gallery-load-error";
    pub const SIMILAR_ERROR: &str = "notification-similar-error";
    pub const FAVORITE_ADDED: &str = "notification-favorite-added";
    pub const FAVORITE_REMOVED: &str = "notification-favorite-removed";
    pub const FAVORITE_ERROR: &str = "notification-favorite-error";
    pub const DELETE_SUCCESS: &str = "notification-delete-success";
    pub const DELETE_ERROR: &str = "notification-delete-error";
    pub const UPLOAD_SUCCESS: &str = "notification-upload-success";
    pub const UPLOAD_DUPLICATE: &str = "notification-upload-duplicate";
    pub const UPLOAD_ERROR: &str = "notification-upload-error";
    pub const DOWNLOAD_SUCCESS: &str = "notification-download-success";
    pub const DOWNLOAD_ERROR: &str = "notification-download-error";
    pub const FILTER_ERROR: &str = "notification-filter-error";
    pub const FILTER_INVALID_PARAMETER: &str = "notification-filter-invalid-parameter";
    pub const OBJECTS_ERROR: &str = "notification-objects-error";
    pub const NO_SELECTION: &str = "notification-no-selection";
    pub const CONFIG_LOAD_ERROR: &str = "notification-config-load-error";

    /// Every key, for catalog completeness checks.
    pub const ALL: [&str; 17] = [
        GALLERY_LOAD_ERROR,
        SIMILAR_ERROR,
        FAVORITE_ADDED,
        FAVORITE_REMOVED,
        FAVORITE_ERROR,
        DELETE_SUCCESS,
        DELETE_ERROR,
        UPLOAD_SUCCESS,
        UPLOAD_DUPLICATE,
        UPLOAD_ERROR,
        DOWNLOAD_SUCCESS,
        DOWNLOAD_ERROR,
        FILTER_ERROR,
        FILTER_INVALID_PARAMETER,
        OBJECTS_ERROR,
        NO_SELECTION,
        CONFIG_LOAD_ERROR,
    ];
}

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Operation completed successfully.
    #[default]
    Success,
    /// Informational message.
    Info,
    /// Something went wrong but the view is still consistent.
    Warning,
    /// Operation failed.
    Error,
}

impl Severity {
    /// Short label used by text front-ends.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Success => "ok",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A notification to be displayed to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Unique identifier for this notification.
    id: NotificationId,
    /// Severity level.
    severity: Severity,
    /// Key identifying the message.
    message_key: String,
    /// Named arguments for message interpolation.
    message_args: Vec<(String, String)>,
    /// When this notification was created.
    created_at: Instant,
    /// Custom auto-dismiss duration (overrides the sink's default).
    custom_dismiss_duration: Option<Duration>,
}

impl Notification {
    /// Creates a new notification with the given severity and message key.
    pub fn new(severity: Severity, message_key: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            severity,
            message_key: message_key.into(),
            message_args: Vec::new(),
            created_at: Instant::now(),
            custom_dismiss_duration: None,
        }
    }

    /// Creates a success notification.
    pub fn success(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Success, message_key)
    }

    /// Creates an info notification.
    pub fn info(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Info, message_key)
    }

    /// Creates a warning notification.
    pub fn warning(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message_key)
    }

    /// Creates an error notification.
    pub fn error(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Error, message_key)
    }

    /// Adds an argument for message interpolation.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.push((key.into(), value.into()));
        self
    }

    /// Sets a custom auto-dismiss duration.
    #[must_use]
    pub fn auto_dismiss(mut self, duration: Duration) -> Self {
        self.custom_dismiss_duration = Some(duration);
        self
    }

    /// Returns the notification's unique ID.
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the severity level.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the message key.
    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    /// Returns the message arguments for interpolation.
    #[must_use]
    pub fn message_args(&self) -> &[(String, String)] {
        &self.message_args
    }

    /// Returns the value of a named argument.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&str> {
        self.message_args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the age of this notification.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Returns whether this notification has outlived its display time.
    ///
    /// `default` applies when no custom duration was set.
    #[must_use]
    pub fn is_expired(&self, default: Duration) -> bool {
        self.age() >= self.custom_dismiss_duration.unwrap_or(default)
    }
}
