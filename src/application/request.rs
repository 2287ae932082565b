// SPDX-License-Identifier: MPL-2.0
//! Generation-tagged remote requests.
//!
//! Slot operations on the session run in three phases:
//!
//! 1. `begin_*` updates state synchronously and returns a [`Pending`]
//!    request carrying the slot's new [`Ticket`].
//! 2. [`Pending::send`] performs the remote call. It only needs the API, so
//!    several requests can be in flight while the session keeps changing.
//! 3. `finish_*` takes the [`Completed`] request and applies it, or discards
//!    it when a newer request was issued for the same slot in the meantime.

use crate::application::port::{GalleryApi, RemoteError};
use crate::domain::blob::Blob;
use crate::domain::gallery::{FetchMode, Image, ImageId};
use crate::domain::generation::Ticket;
use crate::domain::processing::FilterOp;
use crate::domain::similarity::SimilarityQuery;
use std::future::Future;

/// A remote call that can be issued against any [`GalleryApi`].
pub trait RemoteQuery {
    /// Successful response payload.
    type Output;

    /// Issues the call.
    fn run<A: GalleryApi>(
        &self,
        api: &A,
    ) -> impl Future<Output = Result<Self::Output, RemoteError>> + Send;
}

/// Gallery list for one fetch mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchList(pub FetchMode);

impl RemoteQuery for FetchList {
    type Output = Vec<Image>;

    fn run<A: GalleryApi>(
        &self,
        api: &A,
    ) -> impl Future<Output = Result<Vec<Image>, RemoteError>> + Send {
        api.list(&self.0)
    }
}

/// Similarity list for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSimilar {
    pub image: ImageId,
    pub query: SimilarityQuery,
}

impl RemoteQuery for FetchSimilar {
    type Output = Vec<Image>;

    fn run<A: GalleryApi>(
        &self,
        api: &A,
    ) -> impl Future<Output = Result<Vec<Image>, RemoteError>> + Send {
        api.similar(self.image, self.query)
    }
}

/// Filtered rendering of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchFiltered {
    pub image: ImageId,
    pub op: FilterOp,
}

impl RemoteQuery for FetchFiltered {
    type Output = Blob;

    fn run<A: GalleryApi>(&self, api: &A) -> impl Future<Output = Result<Blob, RemoteError>> + Send {
        api.fetch_processed(self.image, self.op)
    }
}

/// Objects overlay of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchObjects(pub ImageId);

impl RemoteQuery for FetchObjects {
    type Output = Blob;

    fn run<A: GalleryApi>(&self, api: &A) -> impl Future<Output = Result<Blob, RemoteError>> + Send {
        api.fetch_objects(self.0)
    }
}

/// A request that has been issued but not sent.
#[derive(Debug)]
#[must_use = "a pending request does nothing until sent and finished"]
pub struct Pending<Q> {
    ticket: Ticket,
    query: Q,
}

impl<Q: RemoteQuery> Pending<Q> {
    pub(crate) fn new(ticket: Ticket, query: Q) -> Self {
        Self { ticket, query }
    }

    /// The call this request will make.
    #[must_use]
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Performs the remote call.
    pub async fn send<A: GalleryApi>(self, api: &A) -> Completed<Q::Output> {
        let outcome = self.query.run(api).await;
        Completed {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// A request whose response has arrived but has not been applied.
#[derive(Debug)]
#[must_use = "a completed request must be handed back to the session"]
pub struct Completed<T> {
    ticket: Ticket,
    outcome: Result<T, RemoteError>,
}

impl<T> Completed<T> {
    /// Returns `true` if the server call succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub(crate) fn into_parts(self) -> (Ticket, Result<T, RemoteError>) {
        (self.ticket, self.outcome)
    }
}
