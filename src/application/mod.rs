// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! This module contains the application layer of the Clean Architecture:
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`gallery`]: Gallery list, selection and view flags
//! - [`navigation`]: Previous/next with wraparound
//! - [`processing`]: Filter session and objects overlay
//! - [`blob`]: Lifetime of displayed binary results
//! - [`request`]: Generation-tagged remote requests
//! - [`session`]: The context object tying everything together
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer uses application layer services
//!
//! # Example
//!
//! ```ignore
//! use gallery_lens::application::session::Session;
//! use gallery_lens::infrastructure::http::RemoteClient;
//!
//! let mut session = Session::new(Arc::new(client), urls, notifications);
//! session.fetch_gallery().await?;
//! session.next();
//! session.select_filter("Sobel").await?;
//! ```

pub mod blob;
pub mod gallery;
pub mod navigation;
pub mod port;
pub mod processing;
pub mod request;
pub mod session;
