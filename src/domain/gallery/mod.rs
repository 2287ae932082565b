// SPDX-License-Identifier: MPL-2.0
//! Gallery domain types.

pub mod image;
pub mod mode;

pub use image::{DetectedObject, Image, ImageId, NO_DISTANCE};
pub use mode::{FetchMode, Tool};
