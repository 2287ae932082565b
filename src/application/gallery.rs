// SPDX-License-Identifier: MPL-2.0
//! In-memory view of the remote collection.
//!
//! [`GalleryState`] owns the gallery list, the view flags that decide which
//! subset is fetched, the selection and the similarity list. It never talks
//! to the server: the session issues requests and hands responses back
//! through the `finish_*` methods.

use crate::application::port::RemoteError;
use crate::domain::gallery::{FetchMode, Image, ImageId, Tool};
use crate::domain::generation::{RequestSlot, Ticket};
use crate::error::{Error, Result};
use std::borrow::Cow;

/// Gallery list, selection and view flags.
#[derive(Debug, Default)]
pub struct GalleryState {
    images: Vec<Image>,
    favorites_only: bool,
    search_tag: String,
    selection: Option<Image>,
    similar: Vec<Image>,
    loading: bool,
    objects_visible: bool,
    tool: Option<Tool>,
    list_slot: RequestSlot,
    similar_slot: RequestSlot,
}

impl GalleryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current gallery list, in server order.
    #[must_use]
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Selected image, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&Image> {
        self.selection.as_ref()
    }

    /// Selected image, or the placeholder entry when nothing is selected.
    #[must_use]
    pub fn selection_or_placeholder(&self) -> Cow<'_, Image> {
        match &self.selection {
            Some(image) => Cow::Borrowed(image),
            None => Cow::Owned(Image::placeholder()),
        }
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<ImageId> {
        self.selection.as_ref().map(|image| image.id)
    }

    /// Images similar to the selection, closest first.
    #[must_use]
    pub fn similar(&self) -> &[Image] {
        &self.similar
    }

    #[must_use]
    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    #[must_use]
    pub fn search_tag(&self) -> &str {
        &self.search_tag
    }

    /// Returns `true` while a gallery fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn objects_visible(&self) -> bool {
        self.objects_visible
    }

    #[must_use]
    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    /// Looks an image up by id in the selection, the gallery list, then the
    /// similarity list.
    #[must_use]
    pub fn find(&self, id: ImageId) -> Option<&Image> {
        self.selection
            .iter()
            .chain(&self.images)
            .chain(&self.similar)
            .find(|image| image.id == id)
    }

    /// Favorite images of the current list.
    pub fn favorites(&self) -> impl Iterator<Item = &Image> {
        self.images.iter().filter(|image| image.favorite)
    }

    // =========================================================================
    // Fetch mode
    // =========================================================================

    /// The mode the next gallery fetch uses.
    ///
    /// A non-empty search tag wins over the favorites flag.
    #[must_use]
    pub fn effective_mode(&self) -> FetchMode {
        if !self.search_tag.is_empty() {
            FetchMode::Search(self.search_tag.clone())
        } else if self.favorites_only {
            FetchMode::Favorites
        } else {
            FetchMode::All
        }
    }

    /// Flips the favorites flag. Turning it on clears the search tag.
    ///
    /// Returns the new flag value.
    pub fn toggle_favorites_view(&mut self) -> bool {
        self.favorites_only = !self.favorites_only;
        if self.favorites_only {
            self.search_tag.clear();
        }
        self.favorites_only
    }

    /// Sets the search tag. Surrounding whitespace is ignored.
    pub fn set_search_tag(&mut self, tag: &str) {
        tag.trim().clone_into(&mut self.search_tag);
    }

    pub fn clear_search_tag(&mut self) {
        self.search_tag.clear();
    }

    /// Sets the view flags so that `mode` becomes the effective mode.
    pub fn apply_mode(&mut self, mode: &FetchMode) {
        match mode {
            FetchMode::All => {
                self.favorites_only = false;
                self.search_tag.clear();
            }
            FetchMode::Favorites => {
                self.favorites_only = true;
                self.search_tag.clear();
            }
            FetchMode::Search(tag) => self.set_search_tag(tag),
        }
    }

    /// Turns favorites mode and the objects overlay off.
    pub fn reset_view(&mut self) {
        self.favorites_only = false;
        self.objects_visible = false;
    }

    // =========================================================================
    // Gallery list
    // =========================================================================

    /// Starts a gallery fetch for the effective mode.
    pub fn begin_fetch(&mut self) -> (Ticket, FetchMode) {
        self.loading = true;
        (self.list_slot.issue(), self.effective_mode())
    }

    /// Applies a gallery response.
    ///
    /// The list is replaced wholesale on success and left untouched on
    /// failure. Returns the new list length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleResponseDiscarded`] if a newer fetch was issued,
    /// or the converted remote error.
    pub fn finish_fetch(
        &mut self,
        ticket: &Ticket,
        outcome: std::result::Result<Vec<Image>, RemoteError>,
    ) -> Result<usize> {
        if !self.list_slot.settle(ticket) {
            return Err(Error::StaleResponseDiscarded);
        }
        self.loading = false;
        self.images = outcome?;
        Ok(self.images.len())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects `image`, clearing the similarity list and hiding the overlay.
    ///
    /// Outstanding similarity requests become stale.
    pub fn select(&mut self, image: Image) {
        self.selection = Some(image);
        self.clear_similar();
        self.objects_visible = false;
    }

    /// Drops the selection, clearing everything that depends on it.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.clear_similar();
        self.objects_visible = false;
    }

    pub fn set_objects_visible(&mut self, visible: bool) {
        self.objects_visible = visible;
    }

    /// Records the active tool and clears the similarity list.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = Some(tool);
        self.clear_similar();
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Current favorite status of `id`, taken from the first local copy.
    #[must_use]
    pub fn favorite_state(&self, id: ImageId) -> Option<bool> {
        self.find(id).map(|image| image.favorite)
    }

    /// Sets the favorite status on every local copy of `id`.
    pub fn set_favorite(&mut self, id: ImageId, favorite: bool) {
        self.images
            .iter_mut()
            .chain(self.selection.iter_mut())
            .chain(self.similar.iter_mut())
            .filter(|image| image.id == id)
            .for_each(|image| image.favorite = favorite);
    }

    // =========================================================================
    // Similarity list
    // =========================================================================

    /// Starts a similarity fetch.
    pub fn begin_similar(&mut self) -> Ticket {
        self.similar_slot.issue()
    }

    /// Applies a similarity response. Returns the new list length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleResponseDiscarded`] if the request was
    /// superseded or invalidated by a selection or tool change, or the
    /// converted remote error.
    pub fn finish_similar(
        &mut self,
        ticket: &Ticket,
        outcome: std::result::Result<Vec<Image>, RemoteError>,
    ) -> Result<usize> {
        if !self.similar_slot.settle(ticket) {
            return Err(Error::StaleResponseDiscarded);
        }
        self.similar = outcome?;
        Ok(self.similar.len())
    }

    /// Returns `true` while a similarity fetch is in flight.
    #[must_use]
    pub fn is_fetching_similar(&self) -> bool {
        self.similar_slot.is_in_flight()
    }

    fn clear_similar(&mut self) {
        self.similar.clear();
        self.similar_slot.invalidate();
    }
}
