// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! These traits describe the collaborators the session talks to. They use
//! only domain types, so the application layer stays independent of the
//! HTTP stack and of whatever renders the results.
//!
//! # Available Ports
//!
//! - [`gallery`]: Remote image service
//! - [`object_url`]: Transient references for binary results, and file saving
//! - [`notify`]: Success/failure notifications
//!
//! # Design Notes
//!
//! - Remote operations return `impl Future + Send`; the session awaits them
//!   without holding any borrow of its own state
//! - Object URL and notification ports are synchronous
//! - Methods return `Result` with port-specific error types

pub mod gallery;
pub mod notify;
pub mod object_url;

pub use gallery::{GalleryApi, RemoteError, UploadFile};
pub use notify::NotificationSink;
pub use object_url::ObjectUrlProvider;
