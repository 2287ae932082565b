// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Server**: Base URL and request timeouts
//! - **Similarity**: Size of similarity lookups
//! - **Notifications**: Toast display duration

// ==========================================================================
// Server Defaults
// ==========================================================================

/// Default address of the image service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8181/";

/// Default timeout of metadata requests (in milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Minimum metadata timeout (in milliseconds).
pub const MIN_TIMEOUT_MS: u64 = 500;

/// Maximum metadata timeout (in milliseconds).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Minimum processing timeout when one is configured (in seconds).
pub const MIN_PROCESSING_TIMEOUT_SECS: u64 = 1;

/// Maximum processing timeout when one is configured (in seconds).
pub const MAX_PROCESSING_TIMEOUT_SECS: u64 = 3_600;

// ==========================================================================
// Similarity Defaults
// ==========================================================================

/// Default number of similar images requested.
pub const DEFAULT_SIMILAR_COUNT: u32 = crate::domain::similarity::DEFAULT_COUNT;

/// Minimum number of similar images requested.
pub const MIN_SIMILAR_COUNT: u32 = 1;

/// Maximum number of similar images requested.
pub const MAX_SIMILAR_COUNT: u32 = 100;

// ==========================================================================
// Notification Defaults
// ==========================================================================

/// Default time a toast stays visible (in seconds).
pub const DEFAULT_TOAST_SECS: u64 = 3;

/// Minimum toast duration (in seconds).
pub const MIN_TOAST_SECS: u64 = 1;

/// Maximum toast duration (in seconds).
pub const MAX_TOAST_SECS: u64 = 30;
