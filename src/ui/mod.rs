// SPDX-License-Identifier: MPL-2.0
//! Presentation helpers shared by front-ends.

pub mod notifications;
