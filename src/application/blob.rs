// SPDX-License-Identifier: MPL-2.0
//! Lifetime management for binary results.
//!
//! Every payload the presentation layer displays is wrapped in a
//! [`BlobHandle`]: the payload plus the transient [`ObjectUrl`] created for
//! it. Handles live in `Option<BlobHandle>` slots owned by the session. A
//! handle is not `Clone`, and releasing consumes it, so each created URL is
//! revoked exactly once.

use crate::application::port::ObjectUrlProvider;
use crate::domain::blob::{Blob, ObjectUrl};
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// A displayed binary result and the reference created for it.
#[derive(Debug, PartialEq, Eq)]
pub struct BlobHandle {
    blob: Blob,
    url: ObjectUrl,
}

impl BlobHandle {
    /// Returns the payload.
    #[must_use]
    pub fn blob(&self) -> &Blob {
        &self.blob
    }

    /// Returns the reference the presentation layer renders.
    #[must_use]
    pub fn url(&self) -> &ObjectUrl {
        &self.url
    }
}

/// Creates and releases [`BlobHandle`]s through an [`ObjectUrlProvider`].
#[derive(Debug)]
pub struct BlobManager<U> {
    provider: Arc<U>,
}

impl<U: ObjectUrlProvider> BlobManager<U> {
    pub fn new(provider: Arc<U>) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    #[must_use]
    pub fn provider(&self) -> &Arc<U> {
        &self.provider
    }

    /// Stores `blob` in `slot`, releasing the handle it held first.
    ///
    /// The old reference is revoked before the new one is created, so a slot
    /// never owns two live references.
    pub fn materialize<'a>(&self, slot: &'a mut Option<BlobHandle>, blob: Blob) -> &'a BlobHandle {
        self.release(slot);
        let url = self.provider.create(&blob);
        log::debug!("Materialized {} bytes as {}", blob.len(), url);
        slot.insert(BlobHandle { blob, url })
    }

    /// Releases the handle held by `slot`. Empty slots are left alone.
    pub fn release(&self, slot: &mut Option<BlobHandle>) {
        if let Some(handle) = slot.take() {
            log::debug!("Revoking {}", handle.url);
            self.provider.revoke(&handle.url);
        }
    }

    /// Saves `blob` under `filename` through a short-lived reference.
    ///
    /// The reference is revoked whether or not saving succeeds.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the payload cannot be saved.
    pub fn trigger_download(&self, blob: &Blob, filename: &str) -> Result<PathBuf> {
        let guard = RevokeOnDrop {
            provider: self.provider.as_ref(),
            url: self.provider.create(blob),
        };
        self.provider.save(&guard.url, filename)
    }
}

/// Revokes a reference when dropped.
struct RevokeOnDrop<'a, U: ObjectUrlProvider> {
    provider: &'a U,
    url: ObjectUrl,
}

impl<U: ObjectUrlProvider> Drop for RevokeOnDrop<'_, U> {
    fn drop(&mut self) {
        self.provider.revoke(&self.url);
    }
}
