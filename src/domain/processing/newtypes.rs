// SPDX-License-Identifier: MPL-2.0
//! Processing newtypes.
//!
//! Type-safe wrappers for filter parameters. Unlike the clamping value
//! objects used elsewhere, these reject out-of-range input: a silently
//! clamped colour would request a different image than the user picked.

use std::fmt;

// =============================================================================
// Bounds
// =============================================================================

/// Colour palette bounds (12-step hue wheel).
pub mod palette_bounds {
    /// Number of entries in the palette.
    pub const LEN: usize = 12;
    /// Hue distance between two consecutive entries, in degrees.
    pub const STEP_DEGREES: u16 = 30;
    /// Default palette index (red).
    pub const DEFAULT_INDEX: usize = 0;
}

/// Mean filter kernel bounds.
pub mod kernel_bounds {
    /// Default kernel size for the mean filter.
    pub const DEFAULT: u32 = 11;
    /// Largest kernel size the server accepts (a signed 32-bit integer).
    pub const MAX: i64 = i32::MAX as i64;
}

// =============================================================================
// ParameterError
// =============================================================================

/// Rejected filter name or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// The filter name is not one of the known filters.
    UnknownFilter(String),
    /// The palette index is outside `0..12`.
    ColorIndexOutOfRange(i64),
    /// The kernel size is zero or negative.
    KernelSizeNotPositive(i64),
    /// The kernel size is even, so the kernel has no centre.
    KernelSizeEven(i64),
    /// The kernel size does not fit the server's 32-bit parameter.
    KernelSizeTooLarge(i64),
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::UnknownFilter(name) => write!(f, "unknown filter: {name}"),
            ParameterError::ColorIndexOutOfRange(index) => write!(
                f,
                "colour index {index} is outside 0..{}",
                palette_bounds::LEN
            ),
            ParameterError::KernelSizeNotPositive(size) => {
                write!(f, "kernel size {size} must be positive")
            }
            ParameterError::KernelSizeEven(size) => write!(f, "kernel size {size} must be odd"),
            ParameterError::KernelSizeTooLarge(size) => write!(
                f,
                "kernel size {size} exceeds {}",
                kernel_bounds::MAX
            ),
        }
    }
}

impl std::error::Error for ParameterError {}

// =============================================================================
// ColorIndex
// =============================================================================

/// Index into the 12-entry hue palette (red, orange, yellow, jade,
/// light green, green, sky blue, light blue, blue, purple, magenta, pink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorIndex(usize);

impl ColorIndex {
    /// Validates a palette index.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::ColorIndexOutOfRange`] for negative indices
    /// and indices of 12 or more.
    pub fn new(index: i64) -> Result<Self, ParameterError> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < palette_bounds::LEN)
            .map(Self)
            .ok_or(ParameterError::ColorIndexOutOfRange(index))
    }

    /// Returns the palette position.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }

    /// Returns the hue sent to the server for this palette entry.
    #[must_use]
    pub fn hue(self) -> Hue {
        // Index is < 12, so the product fits in u16.
        #[allow(clippy::cast_possible_truncation)]
        Hue(self.0 as u16 * palette_bounds::STEP_DEGREES)
    }
}

impl Default for ColorIndex {
    fn default() -> Self {
        Self(palette_bounds::DEFAULT_INDEX)
    }
}

/// Hue in degrees on the colour wheel, always a palette value (0, 30, ..., 330).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hue(u16);

impl Hue {
    /// Returns the hue in degrees.
    #[must_use]
    pub fn degrees(self) -> u16 {
        self.0
    }
}

// =============================================================================
// KernelSize
// =============================================================================

/// Mean filter kernel size, guaranteed positive and odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelSize(u32);

impl KernelSize {
    /// Validates a kernel size.
    ///
    /// # Errors
    ///
    /// Returns an error when `size` is not positive, is even, or is larger
    /// than [`kernel_bounds::MAX`].
    pub fn new(size: i64) -> Result<Self, ParameterError> {
        if size <= 0 {
            return Err(ParameterError::KernelSizeNotPositive(size));
        }
        if size > kernel_bounds::MAX {
            return Err(ParameterError::KernelSizeTooLarge(size));
        }
        if size % 2 == 0 {
            return Err(ParameterError::KernelSizeEven(size));
        }
        u32::try_from(size)
            .map(Self)
            .map_err(|_| ParameterError::KernelSizeTooLarge(size))
    }

    /// Returns the kernel size.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for KernelSize {
    fn default() -> Self {
        Self(kernel_bounds::DEFAULT)
    }
}
