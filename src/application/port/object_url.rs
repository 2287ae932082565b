// SPDX-License-Identifier: MPL-2.0
//! Object URL port definition.
//!
//! Models the platform primitive that turns a binary payload into a
//! short-lived reference the presentation layer can render, plus the
//! "save as" action used for downloads.

use crate::domain::blob::{Blob, ObjectUrl};
use crate::error::Result;
use std::path::PathBuf;

/// Port for creating and revoking transient references to binary payloads.
///
/// Methods take `&self`: the provider is a shared platform resource and
/// implementations synchronise internally.
pub trait ObjectUrlProvider: Send + Sync {
    /// Creates a new reference to `blob`.
    fn create(&self, blob: &Blob) -> ObjectUrl;

    /// Revokes `url`. Revoking an unknown or already revoked URL is a no-op.
    fn revoke(&self, url: &ObjectUrl);

    /// Saves the payload behind `url` under `filename`.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not live or the payload cannot be written.
    fn save(&self, url: &ObjectUrl, filename: &str) -> Result<PathBuf>;
}
