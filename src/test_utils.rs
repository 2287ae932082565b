// SPDX-License-Identifier: MPL-2.0
//! Test doubles for the application ports.
//!
//! [`FakeGallery`] keeps a small server-side collection in memory and records
//! every call; [`RecordingUrls`] counts created and revoked references.

use crate::application::port::{GalleryApi, ObjectUrlProvider, RemoteError, UploadFile};
use crate::domain::blob::{Blob, ObjectUrl};
use crate::domain::gallery::{FetchMode, Image, ImageId};
use crate::domain::processing::FilterOp;
use crate::domain::similarity::SimilarityQuery;
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::future::{ready, Future};
use std::path::PathBuf;
use std::sync::Mutex;

/// Builds a gallery entry with a single tag.
pub fn image(id: i64, tag: &str) -> Image {
    let mut image = Image::new(ImageId::new(id), format!("{tag}{id}.jpg"));
    image.media_type = "image/jpeg".to_string();
    image.tags = vec![tag.to_string()];
    image
}

// =============================================================================
// FakeGallery
// =============================================================================

/// In-memory stand-in for the image service.
#[derive(Debug, Default)]
pub struct FakeGallery {
    images: Mutex<Vec<Image>>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, RemoteError>>,
}

impl FakeGallery {
    pub fn with_images(images: Vec<Image>) -> Self {
        Self {
            images: Mutex::new(images),
            ..Self::default()
        }
    }

    /// Makes every future call to `operation` fail with `error`.
    pub fn fail(&self, operation: &'static str, error: RemoteError) {
        self.failures.lock().unwrap().insert(operation, error);
    }

    /// Undoes [`FakeGallery::fail`] for `operation`.
    pub fn recover(&self, operation: &'static str) {
        self.failures.lock().unwrap().remove(operation);
    }

    /// Every call made so far, as `operation` or `operation:detail`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls to `operation`.
    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split(':').next() == Some(operation))
            .count()
    }

    /// Server-side favorite status of `id`.
    pub fn is_favorite(&self, id: i64) -> Option<bool> {
        self.images
            .lock()
            .unwrap()
            .iter()
            .find(|image| image.id.value() == id)
            .map(|image| image.favorite)
    }

    /// Number of images stored server-side.
    pub fn len(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    fn call(&self, operation: &'static str, detail: String) -> std::result::Result<(), RemoteError> {
        let entry = if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{operation}:{detail}")
        };
        self.calls.lock().unwrap().push(entry);
        match self.failures.lock().unwrap().get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn not_found(id: ImageId) -> RemoteError {
        RemoteError::Status {
            status: 404,
            message: format!("image {id} not found"),
        }
    }

    fn do_list(&self, mode: &FetchMode) -> std::result::Result<Vec<Image>, RemoteError> {
        let detail = match mode {
            FetchMode::All => "all".to_string(),
            FetchMode::Favorites => "favorites".to_string(),
            FetchMode::Search(tag) => format!("search={tag}"),
        };
        self.call("list", detail)?;
        let images = self.images.lock().unwrap();
        Ok(images
            .iter()
            .filter(|image| match mode {
                FetchMode::All => true,
                FetchMode::Favorites => image.favorite,
                FetchMode::Search(tag) => image.has_tag(tag),
            })
            .cloned()
            .collect())
    }

    fn do_similar(
        &self,
        id: ImageId,
        query: SimilarityQuery,
    ) -> std::result::Result<Vec<Image>, RemoteError> {
        self.call("similar", format!("{id}"))?;
        let images = self.images.lock().unwrap();
        let count = usize::try_from(query.count).unwrap_or(usize::MAX);
        Ok(images
            .iter()
            .filter(|image| image.id != id)
            .take(count)
            .enumerate()
            .map(|(rank, image)| {
                let mut similar = Image::new(image.id, image.name.clone());
                similar.distance = rank as f64 * 0.1;
                similar
            })
            .collect())
    }

    fn do_toggle(&self, id: ImageId) -> std::result::Result<(), RemoteError> {
        self.call("toggle_favorite", format!("{id}"))?;
        let mut images = self.images.lock().unwrap();
        let image = images
            .iter_mut()
            .find(|image| image.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        image.favorite = !image.favorite;
        Ok(())
    }

    fn do_delete(&self, id: ImageId) -> std::result::Result<(), RemoteError> {
        self.call("delete", format!("{id}"))?;
        let mut images = self.images.lock().unwrap();
        let before = images.len();
        images.retain(|image| image.id != id);
        if images.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    fn do_upload(&self, file: &UploadFile) -> std::result::Result<(), RemoteError> {
        self.call("upload", file.name.clone())?;
        let mut images = self.images.lock().unwrap();
        if images.iter().any(|image| image.name == file.name) {
            return Err(RemoteError::Status {
                status: 409,
                message: "Conflict".to_string(),
            });
        }
        let next = images.iter().map(|image| image.id.value()).max().unwrap_or(0) + 1;
        let mut image = Image::new(ImageId::new(next), file.name.clone());
        image.media_type.clone_from(&file.content_type);
        images.push(image);
        Ok(())
    }

    fn do_fetch(&self, operation: &'static str, id: ImageId, body: String) -> std::result::Result<Blob, RemoteError> {
        self.call(operation, body.clone())?;
        if !self.images.lock().unwrap().iter().any(|image| image.id == id) {
            return Err(Self::not_found(id));
        }
        Ok(Blob::new(body.into_bytes(), "image/png"))
    }
}

impl GalleryApi for FakeGallery {
    fn list(
        &self,
        mode: &FetchMode,
    ) -> impl Future<Output = std::result::Result<Vec<Image>, RemoteError>> + Send {
        ready(self.do_list(mode))
    }

    fn similar(
        &self,
        id: ImageId,
        query: SimilarityQuery,
    ) -> impl Future<Output = std::result::Result<Vec<Image>, RemoteError>> + Send {
        ready(self.do_similar(id, query))
    }

    fn toggle_favorite(
        &self,
        id: ImageId,
    ) -> impl Future<Output = std::result::Result<(), RemoteError>> + Send {
        ready(self.do_toggle(id))
    }

    fn delete(&self, id: ImageId) -> impl Future<Output = std::result::Result<(), RemoteError>> + Send {
        ready(self.do_delete(id))
    }

    fn upload(
        &self,
        file: &UploadFile,
    ) -> impl Future<Output = std::result::Result<(), RemoteError>> + Send {
        ready(self.do_upload(file))
    }

    fn fetch_image(&self, id: ImageId) -> impl Future<Output = std::result::Result<Blob, RemoteError>> + Send {
        ready(self.do_fetch("fetch_image", id, format!("{id}")))
    }

    fn fetch_processed(
        &self,
        id: ImageId,
        op: FilterOp,
    ) -> impl Future<Output = std::result::Result<Blob, RemoteError>> + Send {
        let body = match op.parameter() {
            Some(param) => format!("{id}/{}/{param}", op.kind()),
            None => format!("{id}/{}", op.kind()),
        };
        ready(self.do_fetch("fetch_processed", id, body))
    }

    fn fetch_objects(&self, id: ImageId) -> impl Future<Output = std::result::Result<Blob, RemoteError>> + Send {
        ready(self.do_fetch("fetch_objects", id, format!("{id}/objects")))
    }
}

// =============================================================================
// RecordingUrls
// =============================================================================

/// Object URL provider that records creations, revocations and saves.
#[derive(Debug, Default)]
pub struct RecordingUrls {
    created: Mutex<Vec<ObjectUrl>>,
    revoked: Mutex<Vec<ObjectUrl>>,
    saved: Mutex<Vec<String>>,
    fail_saves: bool,
}

impl RecordingUrls {
    /// A provider whose `save` always fails.
    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn created(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn revoked(&self) -> usize {
        self.revoked.lock().unwrap().len()
    }

    pub fn revoked_urls(&self) -> Vec<ObjectUrl> {
        self.revoked.lock().unwrap().clone()
    }

    /// File names passed to `save`, in call order.
    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }

    /// References created but not yet revoked.
    pub fn live(&self) -> usize {
        let revoked: HashSet<ObjectUrl> = self.revoked.lock().unwrap().iter().cloned().collect();
        self.created
            .lock()
            .unwrap()
            .iter()
            .filter(|url| !revoked.contains(url))
            .count()
    }
}

impl ObjectUrlProvider for RecordingUrls {
    fn create(&self, _blob: &Blob) -> ObjectUrl {
        let mut created = self.created.lock().unwrap();
        let url = ObjectUrl::new(format!("blob:test/{}", created.len()));
        created.push(url.clone());
        url
    }

    fn revoke(&self, url: &ObjectUrl) {
        let mut revoked = self.revoked.lock().unwrap();
        assert!(!revoked.contains(url), "{url} revoked twice");
        revoked.push(url.clone());
    }

    fn save(&self, _url: &ObjectUrl, filename: &str) -> Result<PathBuf> {
        if self.fail_saves {
            return Err(Error::Io("disk full".to_string()));
        }
        self.saved.lock().unwrap().push(filename.to_string());
        Ok(PathBuf::from(filename))
    }
}
