// SPDX-License-Identifier: MPL-2.0
//! Gallery entry types.
//!
//! Images are only ever created from server responses. The single exception
//! is [`Image::placeholder`], the "empty" entry shown before anything is
//! selected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance value carried by images that do not come from a similarity query.
pub const NO_DISTANCE: f64 = -1.0;

/// Server-assigned image identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(i64);

impl ImageId {
    /// Identifier of the placeholder entry.
    pub const PLACEHOLDER: ImageId = ImageId(-1);

    /// Wraps a raw server identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An object recognised by the server inside an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: String,
    pub confidence: f32,
    pub width: u32,
    pub height: u32,
    pub pos_x: u32,
    pub pos_y: u32,
}

/// Metadata for one gallery entry.
///
/// List responses carry tags, favorite status and recognised objects but no
/// distance; similarity responses carry a distance and nothing else. Missing
/// fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub media_type: String,
    #[serde(default)]
    pub size: String,
    #[serde(default = "default_distance")]
    pub distance: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
}

fn default_distance() -> f64 {
    NO_DISTANCE
}

impl Image {
    /// Creates an image with the given identity and empty metadata.
    pub fn new(id: ImageId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            media_type: String::new(),
            size: String::new(),
            distance: NO_DISTANCE,
            tags: Vec::new(),
            favorite: false,
            objects: Vec::new(),
        }
    }

    /// The "empty" entry displayed before any selection exists.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            media_type: "Empty".to_string(),
            size: "Empty".to_string(),
            ..Self::new(ImageId::PLACEHOLDER, "Empty")
        }
    }

    /// Returns `true` for the placeholder entry.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.id == ImageId::PLACEHOLDER
    }

    /// Returns `true` when this entry came out of a similarity query.
    #[must_use]
    pub fn has_distance(&self) -> bool {
        self.distance >= 0.0
    }

    /// Returns `true` if any tag matches `tag`, ignoring ASCII case.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
