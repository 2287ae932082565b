// SPDX-License-Identifier: MPL-2.0
//! HTTP adapter for the remote image service.
//!
//! - [`routes`]: Request paths and query parameters
//! - [`client`]: Transport with separate metadata and processing clients
//! - `gallery`: [`GalleryApi`](crate::application::port::GalleryApi) implementation

pub mod client;
mod gallery;
pub mod routes;

pub use client::{ClientSettings, RemoteClient, Transport};
pub use routes::Route;
