// SPDX-License-Identifier: MPL-2.0
//! Previous/next navigation over the gallery list.
//!
//! Navigation wraps around at both ends. The current image is located by id;
//! an image that is not in the list behaves as if it sat just before the
//! first element, so `next` yields the first image and `previous` the last.

use crate::domain::gallery::{Image, ImageId};

/// Position of `current` in `images`, or `None` when it is absent.
fn position(images: &[Image], current: Option<ImageId>) -> Option<usize> {
    let current = current?;
    images.iter().position(|image| image.id == current)
}

/// Returns the image after `current`, wrapping to the first.
///
/// Returns `None` for an empty list.
#[must_use]
pub fn next(images: &[Image], current: Option<ImageId>) -> Option<&Image> {
    if images.is_empty() {
        return None;
    }
    let index = match position(images, current) {
        Some(index) if index + 1 < images.len() => index + 1,
        Some(_) | None => 0,
    };
    images.get(index)
}

/// Returns the image before `current`, wrapping to the last.
///
/// Returns `None` for an empty list.
#[must_use]
pub fn previous(images: &[Image], current: Option<ImageId>) -> Option<&Image> {
    let last = images.len().checked_sub(1)?;
    let index = match position(images, current) {
        Some(index) if index > 0 => index - 1,
        Some(_) | None => last,
    };
    images.get(index)
}
