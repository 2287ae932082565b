// SPDX-License-Identifier: MPL-2.0
//! Similarity query types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Feature representation compared by a similarity query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Descriptor {
    /// Hue/saturation histogram.
    #[default]
    #[serde(rename = "hshist")]
    HueSaturation,
    /// RGB histogram.
    #[serde(rename = "rgbhist")]
    Rgb,
}

impl Descriptor {
    /// Value of the `descriptor` query parameter.
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            Descriptor::HueSaturation => "hshist",
            Descriptor::Rgb => "rgbhist",
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for Descriptor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hshist" => Ok(Descriptor::HueSaturation),
            "rgbhist" => Ok(Descriptor::Rgb),
            other => Err(format!("unknown descriptor: {other}")),
        }
    }
}

/// Number of similar images requested when nothing else is configured.
pub const DEFAULT_COUNT: u32 = 5;

/// Parameters of a similarity lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityQuery {
    /// Maximum number of images to return.
    pub count: u32,
    pub descriptor: Descriptor,
}

impl Default for SimilarityQuery {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            descriptor: Descriptor::default(),
        }
    }
}
