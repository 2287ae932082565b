// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`http`]: Remote image service over HTTP (implements [`GalleryApi`])
//! - [`object_urls`]: In-memory object URL registry (implements [`ObjectUrlProvider`])
//!
//! [`GalleryApi`]: crate::application::port::GalleryApi
//! [`ObjectUrlProvider`]: crate::application::port::ObjectUrlProvider

pub mod http;
pub mod object_urls;

pub use http::RemoteClient;
pub use object_urls::LocalObjectUrls;
