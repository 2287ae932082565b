// SPDX-License-Identifier: MPL-2.0
//! Gallery fetch modes and side tools.

/// Which subset of the remote collection the gallery list shows.
///
/// Exactly one mode is effective at a time. The view flags that produce it
/// live in the gallery state; see `GalleryState::effective_mode`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Every image on the server.
    #[default]
    All,
    /// Only images marked as favorite.
    Favorites,
    /// Images carrying the given tag.
    Search(String),
}

impl FetchMode {
    /// Returns the tag for search mode.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            FetchMode::Search(tag) => Some(tag),
            FetchMode::All | FetchMode::Favorites => None,
        }
    }
}

/// Side tool chosen for the selected image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Filter and feature processing.
    Filters,
    /// Similar image lookup.
    Similar,
    /// Recognised objects overlay.
    Objects,
}
