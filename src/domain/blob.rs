// SPDX-License-Identifier: MPL-2.0
//! Binary payloads and the transient references used to display them.

use std::fmt;
use std::sync::Arc;

/// Content type used when the server does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Raw binary payload with its declared content type.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Arc<Vec<u8>>,
    content_type: String,
}

impl Blob {
    /// Wraps a payload and its content type.
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            content_type: content_type.into(),
        }
    }

    /// Returns the payload bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the declared content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for an empty payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Transient, locally created reference to a [`Blob`].
///
/// Only meaningful to the provider that created it. Must be revoked once the
/// presentation layer no longer needs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// Wraps a provider-generated reference.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the reference as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
