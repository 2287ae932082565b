// SPDX-License-Identifier: MPL-2.0
//! [`GalleryApi`] implementation over HTTP.

use super::client::{RemoteClient, Transport};
use super::routes::Route;
use crate::application::port::{GalleryApi, RemoteError, UploadFile};
use crate::domain::blob::Blob;
use crate::domain::gallery::{FetchMode, Image, ImageId};
use crate::domain::processing::FilterOp;
use crate::domain::similarity::SimilarityQuery;
use std::future::Future;

impl GalleryApi for RemoteClient {
    fn list(&self, mode: &FetchMode) -> impl Future<Output = Result<Vec<Image>, RemoteError>> + Send {
        let route = Route::list(mode);
        async move { self.get_json::<Vec<Image>>(&route).await }
    }

    fn similar(
        &self,
        id: ImageId,
        query: SimilarityQuery,
    ) -> impl Future<Output = Result<Vec<Image>, RemoteError>> + Send {
        let route = Route::similar(id, query);
        async move { self.get_json::<Vec<Image>>(&route).await }
    }

    fn toggle_favorite(&self, id: ImageId) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let route = Route::toggle_favorite(id);
        async move { self.post(&route).await }
    }

    fn delete(&self, id: ImageId) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let route = Route::image(id);
        async move { RemoteClient::delete(self, &route).await }
    }

    fn upload(&self, file: &UploadFile) -> impl Future<Output = Result<(), RemoteError>> + Send {
        async move { self.upload_multipart(&Route::upload(), file).await }
    }

    fn fetch_image(&self, id: ImageId) -> impl Future<Output = Result<Blob, RemoteError>> + Send {
        let route = Route::image(id);
        async move { self.get_binary(Transport::Metadata, &route).await }
    }

    fn fetch_processed(
        &self,
        id: ImageId,
        op: FilterOp,
    ) -> impl Future<Output = Result<Blob, RemoteError>> + Send {
        let route = Route::filter(id, op);
        async move { self.get_binary(Transport::Processing, &route).await }
    }

    fn fetch_objects(&self, id: ImageId) -> impl Future<Output = Result<Blob, RemoteError>> + Send {
        let route = Route::objects(id);
        async move { self.get_binary(Transport::Processing, &route).await }
    }
}
