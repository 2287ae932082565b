// SPDX-License-Identifier: MPL-2.0
//! The session controller.
//!
//! [`Session`] is the explicit context object of the client. It owns the
//! gallery state, the filter session, the objects overlay and every
//! displayed blob handle, and it is the only place that turns remote
//! outcomes into notifications.
//!
//! Operations touching a request slot come in two flavours: an `async fn`
//! that runs the whole request, and a `begin_*`/`finish_*` pair that lets
//! the caller send the [`Pending`] request itself, so requests for different
//! slots (or superseding requests for the same slot) can overlap.
//!
//! # Notifications
//!
//! Each failed operation emits exactly one error notification. Responses
//! discarded because a newer request superseded them are only logged.

use crate::application::blob::{BlobHandle, BlobManager};
use crate::application::gallery::GalleryState;
use crate::application::navigation;
use crate::application::port::{
    GalleryApi, NotificationSink, ObjectUrlProvider, RemoteError, UploadFile,
};
use crate::application::processing::{FilterSession, ObjectsOverlay};
use crate::application::request::{
    Completed, FetchFiltered, FetchList, FetchObjects, FetchSimilar, Pending,
};
use crate::domain::blob::Blob;
use crate::domain::gallery::{FetchMode, Image, ImageId, Tool};
use crate::domain::notification::{keys, Notification};
use crate::domain::processing::{FilterCommand, FilterKind, FilterOp};
use crate::domain::similarity::SimilarityQuery;
use crate::error::{Error, Result, STATUS_CONFLICT};
use futures_util::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;

/// Client session over one remote gallery.
pub struct Session<A, U, N>
where
    A: GalleryApi,
    U: ObjectUrlProvider,
    N: NotificationSink,
{
    api: Arc<A>,
    blobs: BlobManager<U>,
    sink: N,
    gallery: GalleryState,
    filter: FilterSession,
    overlay: ObjectsOverlay,
    similarity: SimilarityQuery,
}

impl<A, U, N> Session<A, U, N>
where
    A: GalleryApi,
    U: ObjectUrlProvider,
    N: NotificationSink,
{
    /// Creates a session with an empty gallery.
    pub fn new(api: Arc<A>, urls: Arc<U>, sink: N) -> Self {
        Self {
            api,
            blobs: BlobManager::new(urls),
            sink,
            gallery: GalleryState::new(),
            filter: FilterSession::new(),
            overlay: ObjectsOverlay::new(),
            similarity: SimilarityQuery::default(),
        }
    }

    /// Sets the query used by [`Session::fetch_similar`].
    #[must_use]
    pub fn with_similarity_query(mut self, query: SimilarityQuery) -> Self {
        self.similarity = query;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Shared handle to the remote API, for sending pending requests.
    #[must_use]
    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    #[must_use]
    pub fn filter(&self) -> &FilterSession {
        &self.filter
    }

    /// Displayed filter result, if any.
    #[must_use]
    pub fn filter_result(&self) -> Option<&BlobHandle> {
        self.filter.result()
    }

    /// Objects overlay of the selection, if shown.
    #[must_use]
    pub fn objects_overlay(&self) -> Option<&BlobHandle> {
        self.overlay.handle()
    }

    #[must_use]
    pub fn similarity_query(&self) -> SimilarityQuery {
        self.similarity
    }

    #[must_use]
    pub fn url_provider(&self) -> &Arc<U> {
        self.blobs.provider()
    }

    #[must_use]
    pub fn notifications(&self) -> &N {
        &self.sink
    }

    pub fn notifications_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    // =========================================================================
    // Gallery list
    // =========================================================================

    /// Starts a gallery fetch for the effective mode.
    pub fn begin_fetch_gallery(&mut self) -> Pending<FetchList> {
        let (ticket, mode) = self.gallery.begin_fetch();
        log::debug!("Fetching gallery ({mode:?})");
        Pending::new(ticket, FetchList(mode))
    }

    /// Applies a gallery response. Returns the new list length.
    ///
    /// # Errors
    ///
    /// Returns the remote error (notified), or
    /// [`Error::StaleResponseDiscarded`] (silent).
    pub fn finish_fetch_gallery(&mut self, done: Completed<Vec<Image>>) -> Result<usize> {
        let (ticket, outcome) = done.into_parts();
        let result = self.gallery.finish_fetch(&ticket, outcome);
        match &result {
            Ok(len) => log::debug!("Gallery holds {len} images"),
            Err(err) => self.report(keys::GALLERY_LOAD_ERROR, err),
        }
        result
    }

    /// Fetches the gallery list for the effective mode.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_fetch_gallery`].
    pub async fn fetch_gallery(&mut self) -> Result<usize> {
        let pending = self.begin_fetch_gallery();
        let done = pending.send(self.api.as_ref()).await;
        self.finish_fetch_gallery(done)
    }

    /// Switches the view flags to `mode` and fetches.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_fetch_gallery`].
    pub async fn fetch_gallery_in(&mut self, mode: &FetchMode) -> Result<usize> {
        self.gallery.apply_mode(mode);
        self.fetch_gallery().await
    }

    /// Flips favorites-only mode and refetches.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_fetch_gallery`].
    pub async fn toggle_favorites_view(&mut self) -> Result<usize> {
        self.gallery.toggle_favorites_view();
        self.fetch_gallery().await
    }

    /// Searches by tag.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_fetch_gallery`].
    pub async fn search(&mut self, tag: &str) -> Result<usize> {
        self.gallery.set_search_tag(tag);
        self.fetch_gallery().await
    }

    /// Clears the search tag and refetches.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_fetch_gallery`].
    pub async fn clear_search(&mut self) -> Result<usize> {
        self.gallery.clear_search_tag();
        self.fetch_gallery().await
    }

    /// Leaves favorites mode, hides the objects overlay and refetches.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_fetch_gallery`].
    pub async fn refresh_gallery(&mut self) -> Result<usize> {
        self.gallery.reset_view();
        self.overlay.hide(&self.blobs);
        self.fetch_gallery().await
    }

    // =========================================================================
    // Selection and navigation
    // =========================================================================

    /// Selects `image`.
    ///
    /// Clears the similarity list, resets the filter session and hides the
    /// objects overlay before returning. Responses still in flight for the
    /// previous selection become stale.
    pub fn select(&mut self, image: Image) {
        log::debug!("Selecting image {}", image.id);
        self.gallery.select(image);
        self.filter.reset(&self.blobs);
        self.overlay.hide(&self.blobs);
    }

    /// Selects the image with the given id from the gallery or similarity
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] (notified) if no local list holds
    /// `id`. The current selection is left as it was.
    pub fn select_id(&mut self, id: ImageId) -> Result<()> {
        let Some(image) = self.gallery.find(id).cloned() else {
            let err = Error::InvalidParameter(format!("image {id} is not in the gallery"));
            self.report(keys::NO_SELECTION, &err);
            return Err(err);
        };
        self.select(image);
        Ok(())
    }

    /// Drops the selection and everything attached to it.
    pub fn clear_selection(&mut self) {
        self.gallery.clear_selection();
        self.filter.reset(&self.blobs);
        self.overlay.hide(&self.blobs);
    }

    /// Selects the next image, wrapping around. Returns the new selection.
    pub fn next(&mut self) -> Option<ImageId> {
        let image = navigation::next(self.gallery.images(), self.gallery.selected_id())?.clone();
        let id = image.id;
        self.select(image);
        Some(id)
    }

    /// Selects the previous image, wrapping around. Returns the new selection.
    pub fn previous(&mut self) -> Option<ImageId> {
        let image =
            navigation::previous(self.gallery.images(), self.gallery.selected_id())?.clone();
        let id = image.id;
        self.select(image);
        Some(id)
    }

    /// Switches the side tool, clearing the similarity list.
    pub fn set_tool(&mut self, tool: Tool) {
        self.gallery.set_tool(tool);
    }

    // =========================================================================
    // Favorites, deletion and upload
    // =========================================================================

    /// Flips the favorite status of `id`.
    ///
    /// Every local copy is flipped before the request is sent. A failed
    /// request does not roll the flip back. On success in favorites mode the
    /// gallery is refetched. Returns the new favorite status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `id` is not held locally, or
    /// the remote error. Both are notified.
    pub async fn toggle_favorite(&mut self, id: ImageId) -> Result<bool> {
        let Some(current) = self.gallery.favorite_state(id) else {
            let err = Error::InvalidParameter(format!("image {id} is not in the gallery"));
            self.report(keys::FAVORITE_ERROR, &err);
            return Err(err);
        };
        let favorite = !current;
        self.gallery.set_favorite(id, favorite);

        let outcome = self.api.toggle_favorite(id).await;
        if let Err(err) = outcome {
            let err = Error::from(err);
            self.report(keys::FAVORITE_ERROR, &err);
            return Err(err);
        }

        log::info!("Image {id} favorite: {favorite}");
        let key = if favorite {
            keys::FAVORITE_ADDED
        } else {
            keys::FAVORITE_REMOVED
        };
        self.sink
            .notify(Notification::success(key).with_arg("id", id.to_string()));

        if self.gallery.effective_mode() == FetchMode::Favorites {
            // The refetch reports its own failure.
            let _ = self.fetch_gallery().await;
        }
        Ok(favorite)
    }

    /// Deletes `id` on the server and refetches the gallery.
    ///
    /// The selection is dropped if it was the deleted image. Nothing changes
    /// locally on failure.
    ///
    /// # Errors
    ///
    /// Returns the remote error (notified).
    pub async fn remove(&mut self, id: ImageId) -> Result<()> {
        let name = self.display_name(id);
        let outcome = self.api.delete(id).await;
        if let Err(err) = outcome {
            let err = Error::from(err);
            self.report(keys::DELETE_ERROR, &err);
            return Err(err);
        }

        log::info!("Deleted image {id}");
        if self.gallery.selected_id() == Some(id) {
            self.clear_selection();
        }
        let _ = self.fetch_gallery().await;
        self.sink
            .notify(Notification::success(keys::DELETE_SUCCESS).with_arg("name", name));
        Ok(())
    }

    /// Uploads `file` and refetches the gallery once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] when the server already holds a file
    /// with that name, or the remote error. Both are notified and leave the
    /// gallery list untouched.
    pub async fn upload(&mut self, file: UploadFile) -> Result<()> {
        let outcome = self.api.upload(&file).await;
        if let Err(err) = outcome {
            return Err(if err.status() == Some(STATUS_CONFLICT) {
                let err = Error::DuplicateName(file.name);
                self.report(keys::UPLOAD_DUPLICATE, &err);
                err
            } else {
                let err = Error::from(err);
                self.report(keys::UPLOAD_ERROR, &err);
                err
            });
        }

        log::info!("Uploaded {}", file.name);
        let _ = self.fetch_gallery().await;
        self.sink
            .notify(Notification::success(keys::UPLOAD_SUCCESS).with_arg("name", file.name));
        Ok(())
    }

    // =========================================================================
    // Similarity
    // =========================================================================

    /// Starts a similarity fetch for the selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSelection`] (notified) when nothing is selected.
    pub fn begin_fetch_similar(&mut self, query: SimilarityQuery) -> Result<Pending<FetchSimilar>> {
        let image = self.require_selection()?;
        log::debug!("Fetching {} images similar to {image}", query.count);
        Ok(Pending::new(
            self.gallery.begin_similar(),
            FetchSimilar { image, query },
        ))
    }

    /// Applies a similarity response. Returns the new list length.
    ///
    /// # Errors
    ///
    /// Returns the remote error (notified), or
    /// [`Error::StaleResponseDiscarded`] (silent).
    pub fn finish_fetch_similar(&mut self, done: Completed<Vec<Image>>) -> Result<usize> {
        let (ticket, outcome) = done.into_parts();
        let result = self.gallery.finish_similar(&ticket, outcome);
        if let Err(err) = &result {
            self.report(keys::SIMILAR_ERROR, err);
        }
        result
    }

    /// Fetches images similar to the selection.
    ///
    /// # Errors
    ///
    /// See [`Session::begin_fetch_similar`] and
    /// [`Session::finish_fetch_similar`].
    pub async fn fetch_similar(&mut self, query: SimilarityQuery) -> Result<usize> {
        let pending = self.begin_fetch_similar(query)?;
        let done = pending.send(self.api.as_ref()).await;
        self.finish_fetch_similar(done)
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Starts a filter request for the selection.
    ///
    /// `release_previous` drops the displayed result immediately; otherwise
    /// it stays until the new one arrives.
    fn begin_filter_with(
        &mut self,
        command: FilterCommand,
        release_previous: bool,
    ) -> Result<Pending<FetchFiltered>> {
        let image = self.require_selection()?;
        let op = FilterOp::resolve(command).map_err(|err| {
            let err = Error::from(err);
            self.report(keys::FILTER_INVALID_PARAMETER, &err);
            err
        })?;
        if release_previous {
            self.filter.release_result(&self.blobs);
        }
        log::debug!("Requesting {} for image {image}", op.kind());
        Ok(Pending::new(
            self.filter.begin(op, image),
            FetchFiltered { image, op },
        ))
    }

    /// Starts a filter request for the selection.
    ///
    /// A command without parameter selects a filter afresh and releases the
    /// displayed result. A command with parameter keeps it until the new
    /// result arrives.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSelection`] or [`Error::InvalidParameter`]. Both
    /// are notified and leave the filter session untouched.
    pub fn begin_filter(&mut self, command: FilterCommand) -> Result<Pending<FetchFiltered>> {
        self.begin_filter_with(command, command.parameter.is_none())
    }

    /// Applies a filter response.
    ///
    /// # Errors
    ///
    /// Returns the remote error (notified), or
    /// [`Error::StaleResponseDiscarded`] (silent).
    pub fn finish_filter(&mut self, done: Completed<Blob>) -> Result<()> {
        let (ticket, outcome) = done.into_parts();
        let result = self.filter.finish(&ticket, outcome, &self.blobs);
        if let Err(err) = &result {
            self.report(keys::FILTER_ERROR, err);
        }
        result
    }

    /// Runs a filter command against the selection.
    ///
    /// # Errors
    ///
    /// See [`Session::begin_filter`] and [`Session::finish_filter`].
    pub async fn apply_filter(&mut self, command: FilterCommand) -> Result<()> {
        let pending = self.begin_filter(command)?;
        let done = pending.send(self.api.as_ref()).await;
        self.finish_filter(done)
    }

    /// Selects a filter by name with its default parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for unknown names. See also
    /// [`Session::apply_filter`].
    pub async fn select_filter(&mut self, name: &str) -> Result<()> {
        let filter = name.parse::<FilterKind>().map_err(|err| {
            let err = Error::from(err);
            self.report(keys::FILTER_INVALID_PARAMETER, &err);
            err
        })?;
        self.apply_filter(FilterCommand::select(filter)).await
    }

    /// Applies the colour filter with palette entry `index` (0 to 11).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for indices outside the palette.
    /// See also [`Session::apply_filter`].
    pub async fn set_color_parameter(&mut self, index: i64) -> Result<()> {
        self.apply_filter(FilterCommand::color(index)).await
    }

    /// Applies the mean filter with the given kernel size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `size` is positive and odd.
    /// See also [`Session::apply_filter`].
    pub async fn set_mean_parameter(&mut self, size: i64) -> Result<()> {
        self.apply_filter(FilterCommand::mean(size)).await
    }

    /// Clears the filter and releases its result.
    pub fn reset_filter(&mut self) {
        self.filter.reset(&self.blobs);
    }

    // =========================================================================
    // Objects overlay
    // =========================================================================

    /// Starts fetching the objects overlay of the selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSelection`] (notified).
    pub fn begin_show_objects(&mut self) -> Result<Pending<FetchObjects>> {
        let image = self.require_selection()?;
        Ok(Pending::new(self.overlay.begin(), FetchObjects(image)))
    }

    /// Applies an objects overlay response and shows it.
    ///
    /// # Errors
    ///
    /// Returns the remote error (notified), or
    /// [`Error::StaleResponseDiscarded`] (silent).
    pub fn finish_show_objects(&mut self, done: Completed<Blob>) -> Result<()> {
        let (ticket, outcome) = done.into_parts();
        let result = self.overlay.finish(&ticket, outcome, &self.blobs);
        match &result {
            Ok(()) => self.gallery.set_objects_visible(true),
            Err(err) => self.report(keys::OBJECTS_ERROR, err),
        }
        result
    }

    /// Shows the recognised objects of the selection.
    ///
    /// # Errors
    ///
    /// See [`Session::begin_show_objects`] and
    /// [`Session::finish_show_objects`].
    pub async fn show_objects(&mut self) -> Result<()> {
        let pending = self.begin_show_objects()?;
        let done = pending.send(self.api.as_ref()).await;
        self.finish_show_objects(done)
    }

    /// Hides the objects overlay and releases it.
    pub fn hide_objects(&mut self) {
        self.overlay.hide(&self.blobs);
        self.gallery.set_objects_visible(false);
    }

    // =========================================================================
    // Downloads
    // =========================================================================

    /// Downloads the original of `id` under its gallery name.
    ///
    /// # Errors
    ///
    /// Returns the remote or save error (notified).
    pub async fn download_image(&mut self, id: ImageId) -> Result<PathBuf> {
        let name = self.display_name(id);
        let outcome = self.api.fetch_image(id).await;
        self.save_download(outcome, &name)
    }

    /// Downloads every favorite of the current gallery list.
    ///
    /// Originals are fetched concurrently. Each failure is notified on its
    /// own; the paths of the saved files are returned.
    pub async fn download_favorites(&mut self) -> Vec<PathBuf> {
        let favorites: Vec<(ImageId, String)> = self
            .gallery
            .favorites()
            .map(|image| (image.id, image.name.clone()))
            .collect();
        log::info!("Downloading {} favorites", favorites.len());

        let api = self.api.as_ref();
        let outcomes = join_all(favorites.iter().map(|(id, _)| api.fetch_image(*id))).await;

        favorites
            .iter()
            .zip(outcomes)
            .filter_map(|((_, name), outcome)| self.save_download(outcome, name).ok())
            .collect()
    }

    /// Saves the displayed filter result as `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSelection`] when no result is displayed, or the
    /// save error. Both are notified.
    pub fn download_processed(&mut self, filename: &str) -> Result<PathBuf> {
        let Some(handle) = self.filter.result() else {
            let err = Error::NoSelection;
            self.report(keys::NO_SELECTION, &err);
            return Err(err);
        };
        let blob = handle.blob().clone();
        self.save_download(Ok(blob), filename)
    }

    fn save_download(
        &mut self,
        outcome: std::result::Result<Blob, RemoteError>,
        filename: &str,
    ) -> Result<PathBuf> {
        let result = outcome
            .map_err(Error::from)
            .and_then(|blob| self.blobs.trigger_download(&blob, filename));
        match &result {
            Ok(path) => {
                log::info!("Saved {}", path.display());
                self.sink.notify(
                    Notification::success(keys::DOWNLOAD_SUCCESS)
                        .with_arg("path", path.display().to_string()),
                );
            }
            Err(err) => self.report(keys::DOWNLOAD_ERROR, err),
        }
        result
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_selection(&mut self) -> Result<ImageId> {
        match self.gallery.selected_id() {
            Some(id) => Ok(id),
            None => {
                self.report(keys::NO_SELECTION, &Error::NoSelection);
                Err(Error::NoSelection)
            }
        }
    }

    fn display_name(&self, id: ImageId) -> String {
        self.gallery
            .find(id)
            .map_or_else(|| id.to_string(), |image| image.name.clone())
    }

    /// Emits the error notification for a failed operation.
    fn report(&mut self, key: &str, err: &Error) {
        if err.is_silent() {
            log::debug!("{key}: {err}");
            return;
        }
        log::warn!("{key}: {err}");
        let mut notification = Notification::error(key).with_arg("error", err.to_string());
        if let Some(status) = err.status() {
            notification = notification.with_arg("status", status.to_string());
        }
        self.sink.notify(notification);
    }
}

impl<A, U, N> Drop for Session<A, U, N>
where
    A: GalleryApi,
    U: ObjectUrlProvider,
    N: NotificationSink,
{
    fn drop(&mut self) {
        self.filter.reset(&self.blobs);
        self.overlay.hide(&self.blobs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::processing::FilterStatus;
    use crate::domain::notification::Severity;
    use crate::domain::similarity::Descriptor;
    use crate::test_utils::{image, FakeGallery, RecordingUrls};

    type TestSession = Session<FakeGallery, RecordingUrls, Vec<Notification>>;

    fn session(images: Vec<Image>) -> TestSession {
        Session::new(
            Arc::new(FakeGallery::with_images(images)),
            Arc::new(RecordingUrls::default()),
            Vec::new(),
        )
    }

    fn sample() -> Vec<Image> {
        vec![image(1, "cat"), image(2, "dog"), image(3, "cat")]
    }

    async fn loaded() -> TestSession {
        let mut session = session(sample());
        session.fetch_gallery().await.unwrap();
        session
    }

    fn keys_of(session: &TestSession) -> Vec<&str> {
        session
            .notifications()
            .iter()
            .map(Notification::message_key)
            .collect()
    }

    fn server_error() -> RemoteError {
        RemoteError::Status {
            status: 500,
            message: "Internal Server Error".into(),
        }
    }

    // -------------------------------------------------------------------------
    // Gallery list
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn fetch_gallery_loads_all_images() {
        let session = loaded().await;
        assert_eq!(session.gallery().images().len(), 3);
        assert!(!session.gallery().is_loading());
        assert!(session.notifications().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_list_and_notifies_once() {
        let mut session = loaded().await;
        session.api().fail("list", server_error());

        let err = session.fetch_gallery().await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(session.gallery().images().len(), 3);
        assert!(!session.gallery().is_loading());
        assert_eq!(keys_of(&session), vec![keys::GALLERY_LOAD_ERROR]);
    }

    #[tokio::test]
    async fn retry_after_failed_fetch_replaces_list() {
        let mut session = session(sample());
        session.api().fail("list", server_error());
        assert!(session.fetch_gallery().await.is_err());
        assert!(session.gallery().images().is_empty());

        session.api().recover("list");

        assert_eq!(session.fetch_gallery().await, Ok(3));
        assert!(!session.gallery().is_loading());
        assert_eq!(keys_of(&session), vec![keys::GALLERY_LOAD_ERROR]);
    }

    #[tokio::test]
    async fn search_then_favorites_then_back() {
        let mut session = loaded().await;

        assert_eq!(session.search("cat").await, Ok(2));
        assert_eq!(session.toggle_favorites_view().await, Ok(0));
        assert_eq!(session.gallery().search_tag(), "");
        assert_eq!(session.toggle_favorites_view().await, Ok(3));

        assert_eq!(
            session.api().calls(),
            vec![
                "list:all",
                "list:search=cat",
                "list:favorites",
                "list:all"
            ]
        );
    }

    #[tokio::test]
    async fn search_wins_over_favorites_flag() {
        let mut session = loaded().await;
        session.toggle_favorites_view().await.unwrap();
        session.search("dog").await.unwrap();

        assert!(session.gallery().favorites_only());
        assert_eq!(
            session.gallery().effective_mode(),
            FetchMode::Search("dog".into())
        );
        assert_eq!(session.clear_search().await, Ok(0));
        assert_eq!(session.gallery().effective_mode(), FetchMode::Favorites);
    }

    #[tokio::test]
    async fn refresh_leaves_favorites_and_hides_objects() {
        let mut session = loaded().await;
        session.select_id(ImageId::new(1)).unwrap();
        session.show_objects().await.unwrap();
        session.toggle_favorites_view().await.unwrap();

        assert_eq!(session.refresh_gallery().await, Ok(3));
        assert!(!session.gallery().favorites_only());
        assert!(!session.gallery().objects_visible());
        assert!(session.objects_overlay().is_none());
        assert_eq!(session.url_provider().live(), 0);
    }

    #[tokio::test]
    async fn older_gallery_response_is_discarded_silently() {
        let mut session = loaded().await;
        let api = session.api();

        let old = session.begin_fetch_gallery();
        session.gallery.set_search_tag("dog");
        let new = session.begin_fetch_gallery();

        let new = new.send(api.as_ref()).await;
        let old = old.send(api.as_ref()).await;
        assert_eq!(session.finish_fetch_gallery(new), Ok(1));
        assert_eq!(
            session.finish_fetch_gallery(old),
            Err(Error::StaleResponseDiscarded)
        );

        assert_eq!(session.gallery().images().len(), 1);
        assert!(session.notifications().is_empty());
    }

    #[tokio::test]
    async fn list_response_cannot_fill_similarity_list() {
        let mut session = loaded().await;
        let api = session.api();
        session.select_id(ImageId::new(1)).unwrap();

        let list = session.begin_fetch_gallery();
        let similar = session
            .begin_fetch_similar(SimilarityQuery::default())
            .unwrap();
        let list = list.send(api.as_ref()).await;
        assert!(list.is_ok());

        assert_eq!(
            session.finish_fetch_similar(list),
            Err(Error::StaleResponseDiscarded)
        );
        assert!(session.gallery().similar().is_empty());
        assert!(session.gallery().is_fetching_similar());
        assert!(session.notifications().is_empty());

        let similar = similar.send(api.as_ref()).await;
        assert_eq!(session.finish_fetch_similar(similar), Ok(2));
    }

    // -------------------------------------------------------------------------
    // Selection and navigation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn selecting_unknown_id_notifies_once_and_keeps_selection() {
        let mut session = loaded().await;
        session.select_id(ImageId::new(2)).unwrap();

        let err = session.select_id(ImageId::new(42)).unwrap_err();

        assert!(matches!(err, Error::InvalidParameter(_)));
        assert_eq!(session.gallery().selected_id(), Some(ImageId::new(2)));
        assert_eq!(keys_of(&session), vec![keys::NO_SELECTION]);
        assert_eq!(session.notifications()[0].severity(), Severity::Error);
    }

    #[tokio::test]
    async fn selecting_b_discards_everything_queued_for_a() {
        let mut session = loaded().await;
        let api = session.api();
        session.select_id(ImageId::new(1)).unwrap();

        let similar = session
            .begin_fetch_similar(SimilarityQuery::default())
            .unwrap();
        let filter = session
            .begin_filter(FilterCommand::select(FilterKind::Gray))
            .unwrap();
        let objects = session.begin_show_objects().unwrap();

        session.select_id(ImageId::new(2)).unwrap();

        let similar = similar.send(api.as_ref()).await;
        let filter = filter.send(api.as_ref()).await;
        let objects = objects.send(api.as_ref()).await;
        assert!(session.finish_fetch_similar(similar).is_err());
        assert!(session.finish_filter(filter).is_err());
        assert!(session.finish_show_objects(objects).is_err());

        assert!(session.gallery().similar().is_empty());
        assert_eq!(session.filter().status(), FilterStatus::Idle);
        assert!(session.filter_result().is_none());
        assert!(session.objects_overlay().is_none());
        assert!(!session.gallery().objects_visible());
        assert_eq!(session.url_provider().created(), 0);
        assert!(session.notifications().is_empty());
    }

    #[tokio::test]
    async fn navigation_wraps_and_resets_selection_state() {
        let mut session = loaded().await;
        session.select_id(ImageId::new(3)).unwrap();
        session.apply_filter(FilterCommand::select(FilterKind::Sobel)).await.unwrap();
        session.fetch_similar(SimilarityQuery::default()).await.unwrap();

        assert_eq!(session.next(), Some(ImageId::new(1)));
        assert!(session.filter_result().is_none());
        assert!(session.gallery().similar().is_empty());

        assert_eq!(session.previous(), Some(ImageId::new(3)));
        assert_eq!(session.previous(), Some(ImageId::new(2)));
        assert_eq!(session.url_provider().live(), 0);
    }

    #[tokio::test]
    async fn navigation_without_selection_starts_at_ends() {
        let mut session = loaded().await;
        assert_eq!(session.next(), Some(ImageId::new(1)));
        session.clear_selection();
        assert_eq!(session.previous(), Some(ImageId::new(3)));
    }

    #[test]
    fn navigation_on_empty_gallery_does_nothing() {
        let mut session = session(Vec::new());
        assert_eq!(session.next(), None);
        assert_eq!(session.previous(), None);
        assert!(session.gallery().selection_or_placeholder().is_placeholder());
    }

    #[tokio::test]
    async fn set_tool_clears_similar_list() {
        let mut session = loaded().await;
        session.select_id(ImageId::new(1)).unwrap();
        session.fetch_similar(SimilarityQuery::default()).await.unwrap();
        assert!(!session.gallery().similar().is_empty());

        session.set_tool(Tool::Objects);
        assert!(session.gallery().similar().is_empty());
    }

    // -------------------------------------------------------------------------
    // Favorites, deletion and upload
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn toggle_favorite_flips_everywhere_and_notifies() {
        let mut session = loaded().await;
        session.select_id(ImageId::new(2)).unwrap();

        assert_eq!(session.toggle_favorite(ImageId::new(2)).await, Ok(true));
        assert!(session.gallery().images()[1].favorite);
        assert!(session.gallery().selection().unwrap().favorite);
        assert_eq!(session.api().is_favorite(2), Some(true));
        assert_eq!(keys_of(&session), vec![keys::FAVORITE_ADDED]);

        assert_eq!(session.toggle_favorite(ImageId::new(2)).await, Ok(false));
        assert_eq!(
            keys_of(&session),
            vec![keys::FAVORITE_ADDED, keys::FAVORITE_REMOVED]
        );
        assert_eq!(session.api().count("list"), 1);
    }

    #[tokio::test]
    async fn failed_toggle_is_not_rolled_back() {
        let mut session = loaded().await;
        session.api().fail("toggle_favorite", server_error());

        assert!(session.toggle_favorite(ImageId::new(1)).await.is_err());
        assert!(session.gallery().images()[0].favorite);
        assert_eq!(session.api().is_favorite(1), Some(false));
        assert_eq!(keys_of(&session), vec![keys::FAVORITE_ERROR]);
    }

    #[tokio::test]
    async fn toggle_in_favorites_mode_refetches() {
        let mut session = loaded().await;
        session.toggle_favorite(ImageId::new(1)).await.unwrap();
        session.toggle_favorites_view().await.unwrap();
        assert_eq!(session.gallery().images().len(), 1);

        session.toggle_favorite(ImageId::new(1)).await.unwrap();
        assert!(session.gallery().images().is_empty());
        assert_eq!(session.api().count("list"), 3);
    }

    #[tokio::test]
    async fn remove_refetches_and_drops_selection() {
        let mut session = loaded().await;
        session.select_id(ImageId::new(2)).unwrap();

        session.remove(ImageId::new(2)).await.unwrap();

        assert_eq!(session.api().len(), 2);
        assert_eq!(session.gallery().images().len(), 2);
        assert!(session.gallery().selection().is_none());
        let notification = session.notifications().last().unwrap();
        assert_eq!(notification.message_key(), keys::DELETE_SUCCESS);
        assert_eq!(notification.arg("name"), Some("dog2.jpg"));
    }

    #[tokio::test]
    async fn failed_remove_changes_nothing() {
        let mut session = loaded().await;
        session.api().fail("delete", server_error());

        assert!(session.remove(ImageId::new(1)).await.is_err());
        assert_eq!(session.api().len(), 3);
        assert_eq!(session.gallery().images().len(), 3);
        assert_eq!(session.api().count("list"), 1);
        assert_eq!(keys_of(&session), vec![keys::DELETE_ERROR]);
    }

    fn upload_file(name: &str) -> UploadFile {
        UploadFile {
            name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn upload_triggers_exactly_one_refetch() {
        let mut session = loaded().await;

        session.upload(upload_file("new.png")).await.unwrap();

        assert_eq!(session.api().count("list"), 2);
        assert_eq!(session.api().len(), 4);
        assert_eq!(session.gallery().images().len(), 4);
        assert_eq!(keys_of(&session), vec![keys::UPLOAD_SUCCESS]);
    }

    #[tokio::test]
    async fn duplicate_upload_leaves_gallery_unchanged() {
        let mut session = loaded().await;

        let err = session.upload(upload_file("cat1.jpg")).await.unwrap_err();

        assert_eq!(err, Error::DuplicateName("cat1.jpg".into()));
        assert_eq!(session.api().len(), 3);
        assert_eq!(session.api().count("list"), 1);
        assert_eq!(session.gallery().images().len(), 3);
        let notification = &session.notifications()[0];
        assert_eq!(notification.message_key(), keys::UPLOAD_DUPLICATE);
        assert_eq!(notification.arg("status"), Some("409"));
    }

    #[tokio::test]
    async fn other_upload_failures_are_generic() {
        let mut session = loaded().await;
        session.api().fail("upload", server_error());

        let err = session.upload(upload_file("x.png")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(keys_of(&session), vec![keys::UPLOAD_ERROR]);
    }

    // -------------------------------------------------------------------------
    // Similarity
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn fetch_similar_replaces_list() {
        let mut session = loaded().await;
        session.select_id(ImageId::new(1)).unwrap();
        let query = SimilarityQuery {
            count: 1,
            descriptor: Descriptor::Rgb,
        };

        assert_eq!(session.fetch_similar(query).await, Ok(1));
        let similar = &session.gallery().similar()[0];
        assert_eq!(similar.id, ImageId::new(2));
        assert!(similar.has_distance());
    }

    #[tokio::test]
    async fn fetch_similar_requires_selection() {
        let mut session = loaded().await;
        assert_eq!(
            session.fetch_similar(SimilarityQuery::default()).await,
            Err(Error::NoSelection)
        );
        assert_eq!(keys_of(&session), vec![keys::NO_SELECTION]);
        assert_eq!(session.api().count("similar"), 0);
    }

    #[tokio::test]
    async fn failed_similar_keeps_list() {
        let mut session = loaded().await;
        session.select_id(ImageId::new(1)).unwrap();
        session.fetch_similar(SimilarityQuery::default()).await.unwrap();
        session.api().fail("similar", RemoteError::Network("timeout".into()));

        assert!(session.fetch_similar(SimilarityQuery::default()).await.is_err());
        assert_eq!(session.gallery().similar().len(), 2);
        assert_eq!(keys_of(&session), vec![keys::SIMILAR_ERROR]);
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    async fn selected() -> TestSession {
        let mut session = loaded().await;
        session.select_id(ImageId::new(1)).unwrap();
        session
    }

    fn displayed(session: &TestSession) -> Option<&[u8]> {
        session.filter_result().map(|handle| handle.blob().bytes())
    }

    #[tokio::test]
    async fn select_filter_uses_defaults() {
        let mut session = selected().await;

        session.select_filter("Mean").await.unwrap();
        assert_eq!(displayed(&session), Some(&b"1/Mean/11"[..]));

        session.select_filter("Color").await.unwrap();
        assert_eq!(displayed(&session), Some(&b"1/Color/0"[..]));
        assert_eq!(session.filter().status(), FilterStatus::Ready);
        assert_eq!(session.url_provider().live(), 1);
    }

    #[tokio::test]
    async fn unknown_filter_is_rejected_without_request() {
        let mut session = selected().await;

        let err = session.select_filter("Blur").await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert_eq!(session.api().count("fetch_processed"), 0);
        assert_eq!(keys_of(&session), vec![keys::FILTER_INVALID_PARAMETER]);
    }

    #[tokio::test]
    async fn color_palette_maps_to_hue() {
        let mut session = selected().await;

        session.set_color_parameter(8).await.unwrap();
        assert_eq!(displayed(&session), Some(&b"1/Color/240"[..]));
        session.set_color_parameter(11).await.unwrap();
        assert_eq!(session.filter().parameter(), Some(330));

        assert!(session.set_color_parameter(12).await.is_err());
        assert_eq!(session.filter().parameter(), Some(330));
        assert_eq!(displayed(&session), Some(&b"1/Color/330"[..]));
    }

    #[tokio::test]
    async fn mean_size_must_be_positive_and_odd() {
        let mut session = selected().await;

        assert!(session.set_mean_parameter(4).await.is_err());
        assert!(session.set_mean_parameter(0).await.is_err());
        session.set_mean_parameter(3).await.unwrap();
        assert_eq!(displayed(&session), Some(&b"1/Mean/3"[..]));
        assert_eq!(session.api().count("fetch_processed"), 1);
    }

    #[tokio::test]
    async fn filter_requires_selection() {
        let mut session = loaded().await;
        assert_eq!(
            session.select_filter("Gray").await,
            Err(Error::NoSelection)
        );
    }

    #[tokio::test]
    async fn later_filter_wins_over_slower_earlier_one() {
        let mut session = selected().await;
        let api = session.api();

        let first = session
            .begin_filter(FilterCommand::select(FilterKind::Gray))
            .unwrap();
        let second = session
            .begin_filter(FilterCommand::select(FilterKind::Sobel))
            .unwrap();

        let second = second.send(api.as_ref()).await;
        session.finish_filter(second).unwrap();
        let first = first.send(api.as_ref()).await;
        assert_eq!(
            session.finish_filter(first),
            Err(Error::StaleResponseDiscarded)
        );

        assert_eq!(displayed(&session), Some(&b"1/Sobel"[..]));
        assert_eq!(session.url_provider().created(), 1);
        assert!(session.notifications().is_empty());
    }

    #[tokio::test]
    async fn failed_parameter_change_keeps_previous_result() {
        let mut session = selected().await;
        session.set_mean_parameter(5).await.unwrap();
        session.api().fail("fetch_processed", server_error());

        assert!(session.set_mean_parameter(7).await.is_err());

        assert_eq!(session.filter().status(), FilterStatus::Idle);
        assert_eq!(displayed(&session), Some(&b"1/Mean/5"[..]));
        assert_eq!(keys_of(&session), vec![keys::FILTER_ERROR]);
    }

    #[tokio::test]
    async fn selecting_new_filter_releases_result_immediately() {
        let mut session = selected().await;
        session.select_filter("Gray").await.unwrap();

        let pending = session
            .begin_filter(FilterCommand::select(FilterKind::Sobel))
            .unwrap();
        assert!(session.filter_result().is_none());
        assert_eq!(session.url_provider().live(), 0);

        let done = pending.send(session.api().as_ref()).await;
        session.finish_filter(done).unwrap();
        assert_eq!(session.url_provider().live(), 1);
    }

    #[tokio::test]
    async fn reset_filter_releases_result() {
        let mut session = selected().await;
        session.select_filter("Histogram").await.unwrap();

        session.reset_filter();
        session.reset_filter();

        assert_eq!(session.filter().filter(), None);
        assert_eq!(session.url_provider().created(), 1);
        assert_eq!(session.url_provider().revoked(), 1);
    }

    // -------------------------------------------------------------------------
    // Objects and downloads
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn objects_overlay_show_and_hide() {
        let mut session = selected().await;

        session.show_objects().await.unwrap();
        assert!(session.gallery().objects_visible());
        assert_eq!(
            session.objects_overlay().map(|h| h.blob().bytes()),
            Some(&b"1/objects"[..])
        );

        session.hide_objects();
        assert!(!session.gallery().objects_visible());
        assert_eq!(session.url_provider().live(), 0);
    }

    #[tokio::test]
    async fn download_image_saves_under_gallery_name() {
        let mut session = loaded().await;

        let path = session.download_image(ImageId::new(3)).await.unwrap();

        assert_eq!(path, PathBuf::from("cat3.jpg"));
        assert_eq!(session.url_provider().live(), 0);
        assert_eq!(session.notifications()[0].severity(), Severity::Success);
    }

    #[tokio::test]
    async fn download_failure_is_notified() {
        let mut session = loaded().await;
        session.api().fail("fetch_image", server_error());

        assert!(session.download_image(ImageId::new(1)).await.is_err());
        assert_eq!(keys_of(&session), vec![keys::DOWNLOAD_ERROR]);
        assert_eq!(session.url_provider().created(), 0);
    }

    #[tokio::test]
    async fn download_favorites_saves_each_favorite() {
        let mut session = loaded().await;
        session.toggle_favorite(ImageId::new(1)).await.unwrap();
        session.toggle_favorite(ImageId::new(3)).await.unwrap();

        let saved = session.download_favorites().await;

        assert_eq!(saved.len(), 2);
        assert_eq!(session.url_provider().saved(), vec!["cat1.jpg", "cat3.jpg"]);
        assert_eq!(session.api().count("fetch_image"), 2);
    }

    #[tokio::test]
    async fn download_processed_requires_result() {
        let mut session = selected().await;
        assert_eq!(
            session.download_processed("out.png"),
            Err(Error::NoSelection)
        );

        session.select_filter("Sobel").await.unwrap();
        let path = session.download_processed("out.png").unwrap();
        assert_eq!(path, PathBuf::from("out.png"));
        assert_eq!(session.url_provider().live(), 1);
    }

    #[tokio::test]
    async fn dropping_session_releases_every_handle() {
        let mut session = selected().await;
        session.select_filter("Gray").await.unwrap();
        session.show_objects().await.unwrap();
        let urls = Arc::clone(session.url_provider());

        drop(session);

        assert_eq!(urls.created(), 2);
        assert_eq!(urls.live(), 0);
    }
}
