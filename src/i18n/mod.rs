// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the client.
//!
//! This module provides localization capabilities using the Fluent localization system.
//! Notification message keys are Fluent message identifiers; their named
//! arguments become Fluent variables.
//!
//! # Features
//!
//! - Automatic locale detection from CLI, config, or system settings
//! - `.ftl` translation files embedded at compile time
//! - Fallback to `en-US` when the requested locale is unavailable

pub mod fluent;

pub use fluent::I18n;
