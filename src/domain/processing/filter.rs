// SPDX-License-Identifier: MPL-2.0
//! Server-side filters and the commands that select them.
//!
//! The presentation layer builds a [`FilterCommand`] (filter plus optional raw
//! parameter); [`FilterOp::resolve`] validates it into the operation that is
//! actually requested from the server.

use super::newtypes::{ColorIndex, Hue, KernelSize, ParameterError};
use std::fmt;
use std::str::FromStr;

/// A named server-side image transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Gray,
    Color,
    Mean,
    Sobel,
    Histogram,
    Histogram2D,
}

impl FilterKind {
    /// All filters, in the order they are offered to the user.
    pub const ALL: [FilterKind; 6] = [
        FilterKind::Gray,
        FilterKind::Color,
        FilterKind::Mean,
        FilterKind::Sobel,
        FilterKind::Histogram,
        FilterKind::Histogram2D,
    ];

    /// Name used on the wire and in the UI.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Gray => "Gray",
            FilterKind::Color => "Color",
            FilterKind::Mean => "Mean",
            FilterKind::Sobel => "Sobel",
            FilterKind::Histogram => "Histogram",
            FilterKind::Histogram2D => "Histogram2D",
        }
    }

    /// Returns `true` for filters that take a numeric parameter.
    #[must_use]
    pub fn is_parameterized(self) -> bool {
        matches!(self, FilterKind::Color | FilterKind::Mean)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParameterError::UnknownFilter(s.to_string()))
    }
}

/// Typed request from the presentation layer.
///
/// `parameter` is the raw user value: a palette index for `Color`, a kernel
/// size for `Mean`. `None` selects the filter's default. It is ignored for
/// filters without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCommand {
    pub filter: FilterKind,
    pub parameter: Option<i64>,
}

impl FilterCommand {
    /// Selects a filter with its default parameter.
    #[must_use]
    pub fn select(filter: FilterKind) -> Self {
        Self {
            filter,
            parameter: None,
        }
    }

    /// Colour filter with an explicit palette index.
    #[must_use]
    pub fn color(index: i64) -> Self {
        Self {
            filter: FilterKind::Color,
            parameter: Some(index),
        }
    }

    /// Mean filter with an explicit kernel size.
    #[must_use]
    pub fn mean(size: i64) -> Self {
        Self {
            filter: FilterKind::Mean,
            parameter: Some(size),
        }
    }
}

/// Validated filter operation, ready to be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Gray,
    Sobel,
    Histogram,
    Histogram2D,
    Mean(KernelSize),
    Color(Hue),
}

impl FilterOp {
    /// Validates a command into an operation.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] when the parameter is out of range.
    pub fn resolve(command: FilterCommand) -> Result<Self, ParameterError> {
        Ok(match command.filter {
            FilterKind::Gray => FilterOp::Gray,
            FilterKind::Sobel => FilterOp::Sobel,
            FilterKind::Histogram => FilterOp::Histogram,
            FilterKind::Histogram2D => FilterOp::Histogram2D,
            FilterKind::Mean => FilterOp::Mean(
                command
                    .parameter
                    .map(KernelSize::new)
                    .transpose()?
                    .unwrap_or_default(),
            ),
            FilterKind::Color => FilterOp::Color(
                command
                    .parameter
                    .map(ColorIndex::new)
                    .transpose()?
                    .unwrap_or_default()
                    .hue(),
            ),
        })
    }

    /// The filter this operation applies.
    #[must_use]
    pub fn kind(self) -> FilterKind {
        match self {
            FilterOp::Gray => FilterKind::Gray,
            FilterOp::Sobel => FilterKind::Sobel,
            FilterOp::Histogram => FilterKind::Histogram,
            FilterOp::Histogram2D => FilterKind::Histogram2D,
            FilterOp::Mean(_) => FilterKind::Mean,
            FilterOp::Color(_) => FilterKind::Color,
        }
    }

    /// The numeric value sent with the request, if any.
    #[must_use]
    pub fn parameter(self) -> Option<u32> {
        match self {
            FilterOp::Mean(size) => Some(size.value()),
            FilterOp::Color(hue) => Some(u32::from(hue.degrees())),
            FilterOp::Gray | FilterOp::Sobel | FilterOp::Histogram | FilterOp::Histogram2D => {
                None
            }
        }
    }
}
