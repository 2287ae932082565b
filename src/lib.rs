// SPDX-License-Identifier: MPL-2.0
//! `gallery_lens` is the client-side orchestration layer of a remote image
//! gallery.
//!
//! It keeps the gallery list and the selection, navigates with wraparound,
//! requests server-side filters, similarity lookups and object overlays, and
//! owns the lifetime of every binary result it displays. Outcomes are
//! reported as localized toast notifications.

#![doc(html_root_url = "https://docs.rs/gallery_lens/0.1.0")]

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod ui;

#[cfg(test)]
mod test_utils;
