// SPDX-License-Identifier: MPL-2.0
//! Image processing domain types.

pub mod filter;
pub mod newtypes;

pub use filter::{FilterCommand, FilterKind, FilterOp};
pub use newtypes::{ColorIndex, Hue, KernelSize, ParameterError};
