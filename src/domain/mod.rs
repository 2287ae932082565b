// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core gallery types and business rules.
//!
//! This module contains pure domain types and value objects. Apart from
//! `serde` derives for the wire representation of images, it has no
//! dependencies on external crates so it stays trivially testable.
//!
//! # Modules
//!
//! - [`gallery`]: Gallery entries and fetch modes ([`Image`](gallery::Image),
//!   [`ImageId`](gallery::ImageId), [`FetchMode`](gallery::FetchMode))
//! - [`processing`]: Filter kinds and validated parameters
//!   ([`FilterKind`](processing::FilterKind), [`FilterOp`](processing::FilterOp),
//!   [`ColorIndex`](processing::ColorIndex), [`KernelSize`](processing::KernelSize))
//! - [`similarity`]: Similarity queries ([`Descriptor`](similarity::Descriptor))
//! - [`blob`]: Binary payloads and transient references ([`Blob`](blob::Blob),
//!   [`ObjectUrl`](blob::ObjectUrl))
//! - [`generation`]: Request generations used to discard stale responses
//! - [`notification`]: User-facing notifications ([`Notification`](notification::Notification))

pub mod blob;
pub mod gallery;
pub mod generation;
pub mod notification;
pub mod processing;
pub mod similarity;
