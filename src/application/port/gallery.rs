// SPDX-License-Identifier: MPL-2.0
//! Remote gallery port definition.
//!
//! This module defines the [`GalleryApi`] trait, the session's only way to
//! reach the image service. `RemoteClient` in the infrastructure layer is the
//! HTTP implementation; tests use in-memory fakes.

use crate::domain::blob::Blob;
use crate::domain::gallery::{FetchMode, Image, ImageId};
use crate::domain::processing::FilterOp;
use crate::domain::similarity::SimilarityQuery;
use std::fmt;
use std::future::Future;

// =============================================================================
// RemoteError
// =============================================================================

/// Errors that can occur while talking to the image service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never got an answer (connection, timeout, truncated body).
    Network(String),

    /// The server answered with a non-2xx status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The server answered 2xx but the body was not what we expected.
    Decode(String),

    /// The request could not be built (bad URL, bad content type).
    Request(String),
}

impl RemoteError {
    /// Returns the HTTP status, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::Network(_) | RemoteError::Decode(_) | RemoteError::Request(_) => None,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Network(msg) => write!(f, "Network failure: {msg}"),
            RemoteError::Status { status, message } => write!(f, "HTTP {status}: {message}"),
            RemoteError::Decode(msg) => write!(f, "Invalid response: {msg}"),
            RemoteError::Request(msg) => write!(f, "Invalid request: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

// =============================================================================
// UploadFile
// =============================================================================

/// A file to add to the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name as stored on the server.
    pub name: String,
    /// MIME type of the payload.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// =============================================================================
// GalleryApi Trait
// =============================================================================

/// Port for the remote image service.
///
/// Implementations are stateless apart from configuration and are shared
/// through an `Arc`. No method retries on failure.
pub trait GalleryApi: Send + Sync {
    /// Lists images for the given mode.
    fn list(&self, mode: &FetchMode)
        -> impl Future<Output = Result<Vec<Image>, RemoteError>> + Send;

    /// Lists the images most similar to `id`.
    fn similar(
        &self,
        id: ImageId,
        query: SimilarityQuery,
    ) -> impl Future<Output = Result<Vec<Image>, RemoteError>> + Send;

    /// Flips the favorite status of `id` on the server.
    fn toggle_favorite(&self, id: ImageId) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Deletes `id` from the server.
    fn delete(&self, id: ImageId) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Uploads a new image.
    fn upload(&self, file: &UploadFile) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Fetches the original bytes of `id`.
    fn fetch_image(&self, id: ImageId) -> impl Future<Output = Result<Blob, RemoteError>> + Send;

    /// Applies a filter to `id` and returns the rendered result.
    fn fetch_processed(
        &self,
        id: ImageId,
        op: FilterOp,
    ) -> impl Future<Output = Result<Blob, RemoteError>> + Send;

    /// Fetches `id` with its recognised objects drawn on top.
    fn fetch_objects(&self, id: ImageId) -> impl Future<Output = Result<Blob, RemoteError>> + Send;
}
