// SPDX-License-Identifier: MPL-2.0
//! Server-rendered results for the selected image.
//!
//! [`FilterSession`] tracks the active filter, its parameter and the
//! displayed result. [`ObjectsOverlay`] holds the recognised-objects
//! rendering. Both keep at most one request in flight: issuing a new one
//! makes the previous response inert.

use crate::application::blob::{BlobHandle, BlobManager};
use crate::application::port::{ObjectUrlProvider, RemoteError};
use crate::domain::blob::Blob;
use crate::domain::gallery::ImageId;
use crate::domain::generation::{RequestSlot, Ticket};
use crate::domain::processing::{FilterKind, FilterOp};
use crate::error::{Error, Result};

/// Progress of the filter session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterStatus {
    /// No request in flight.
    #[default]
    Idle,
    /// Waiting for the server.
    Processing,
    /// The latest result is displayed.
    Ready,
}

/// Active filter and its displayed result.
#[derive(Debug, Default)]
pub struct FilterSession {
    filter: Option<FilterKind>,
    parameter: Option<u32>,
    target: Option<ImageId>,
    status: FilterStatus,
    result: Option<BlobHandle>,
    slot: RequestSlot,
}

impl FilterSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter chosen by the user, if any.
    #[must_use]
    pub fn filter(&self) -> Option<FilterKind> {
        self.filter
    }

    /// Value sent with the last request (hue degrees or kernel size).
    #[must_use]
    pub fn parameter(&self) -> Option<u32> {
        self.parameter
    }

    /// Image the last request was issued for.
    #[must_use]
    pub fn target(&self) -> Option<ImageId> {
        self.target
    }

    #[must_use]
    pub fn status(&self) -> FilterStatus {
        self.status
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.status == FilterStatus::Processing
    }

    /// Displayed result, if any.
    #[must_use]
    pub fn result(&self) -> Option<&BlobHandle> {
        self.result.as_ref()
    }

    /// Records `op` as the active filter and issues a ticket for it.
    ///
    /// Any request still in flight becomes stale. The displayed result is
    /// kept until the new one arrives.
    pub fn begin(&mut self, op: FilterOp, image: ImageId) -> Ticket {
        self.filter = Some(op.kind());
        self.parameter = op.parameter();
        self.target = Some(image);
        self.status = FilterStatus::Processing;
        self.slot.issue()
    }

    /// Applies a filter response.
    ///
    /// On success the payload replaces the displayed result. On failure the
    /// session goes back to idle and the previous result stays.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleResponseDiscarded`] for superseded responses,
    /// which are never materialized, or the converted remote error.
    pub fn finish<U: ObjectUrlProvider>(
        &mut self,
        ticket: &Ticket,
        outcome: std::result::Result<Blob, RemoteError>,
        blobs: &BlobManager<U>,
    ) -> Result<()> {
        if !self.slot.settle(ticket) {
            return Err(Error::StaleResponseDiscarded);
        }
        match outcome {
            Ok(blob) => {
                blobs.materialize(&mut self.result, blob);
                self.status = FilterStatus::Ready;
                Ok(())
            }
            Err(err) => {
                self.status = FilterStatus::Idle;
                Err(err.into())
            }
        }
    }

    /// Releases the displayed result without touching the active filter.
    pub fn release_result<U: ObjectUrlProvider>(&mut self, blobs: &BlobManager<U>) {
        blobs.release(&mut self.result);
        if self.status == FilterStatus::Ready {
            self.status = FilterStatus::Idle;
        }
    }

    /// Clears the filter, releases the result and makes in-flight requests
    /// stale.
    pub fn reset<U: ObjectUrlProvider>(&mut self, blobs: &BlobManager<U>) {
        self.filter = None;
        self.parameter = None;
        self.target = None;
        self.status = FilterStatus::Idle;
        blobs.release(&mut self.result);
        self.slot.invalidate();
    }
}

/// Recognised-objects rendering of the selected image.
#[derive(Debug, Default)]
pub struct ObjectsOverlay {
    handle: Option<BlobHandle>,
    slot: RequestSlot,
}

impl ObjectsOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn handle(&self) -> Option<&BlobHandle> {
        self.handle.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.slot.is_in_flight()
    }

    pub fn begin(&mut self) -> Ticket {
        self.slot.issue()
    }

    /// Applies an overlay response, replacing the held rendering.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleResponseDiscarded`] for superseded responses, or
    /// the converted remote error.
    pub fn finish<U: ObjectUrlProvider>(
        &mut self,
        ticket: &Ticket,
        outcome: std::result::Result<Blob, RemoteError>,
        blobs: &BlobManager<U>,
    ) -> Result<()> {
        if !self.slot.settle(ticket) {
            return Err(Error::StaleResponseDiscarded);
        }
        blobs.materialize(&mut self.handle, outcome?);
        Ok(())
    }

    /// Releases the rendering and makes in-flight requests stale.
    pub fn hide<U: ObjectUrlProvider>(&mut self, blobs: &BlobManager<U>) {
        blobs.release(&mut self.handle);
        self.slot.invalidate();
    }
}
