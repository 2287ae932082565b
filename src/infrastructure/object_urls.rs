// SPDX-License-Identifier: MPL-2.0
//! In-process object URL registry.
//!
//! [`LocalObjectUrls`] keeps every live payload in memory under a
//! `blob:gallery-lens/<n>` reference. Saving writes the payload into the
//! downloads directory.

use crate::application::port::ObjectUrlProvider;
use crate::domain::blob::{Blob, ObjectUrl};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

const URL_PREFIX: &str = "blob:gallery-lens/";

/// Object URL provider backed by a map of live payloads.
#[derive(Debug)]
pub struct LocalObjectUrls {
    live: Mutex<HashMap<ObjectUrl, Blob>>,
    next_id: AtomicU64,
    download_dir: PathBuf,
}

impl LocalObjectUrls {
    /// Creates a registry that saves downloads into `download_dir`.
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            live: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            download_dir: download_dir.into(),
        }
    }

    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Number of references created and not yet revoked.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns the payload behind `url`, if it is live.
    #[must_use]
    pub fn resolve(&self, url: &ObjectUrl) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ObjectUrl, Blob>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.live
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ObjectUrlProvider for LocalObjectUrls {
    fn create(&self, blob: &Blob) -> ObjectUrl {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = ObjectUrl::new(format!("{URL_PREFIX}{id}"));
        self.lock().insert(url.clone(), blob.clone());
        url
    }

    fn revoke(&self, url: &ObjectUrl) {
        self.lock().remove(url);
    }

    fn save(&self, url: &ObjectUrl, filename: &str) -> Result<PathBuf> {
        let blob = self
            .resolve(url)
            .ok_or_else(|| Error::Io(format!("{url} is not a live object URL")))?;
        let name = sanitize_filename(filename)?;

        fs::create_dir_all(&self.download_dir)?;
        let path = self.download_dir.join(name);
        fs::write(&path, blob.bytes())?;
        Ok(path)
    }
}

/// Keeps only the final path component so downloads stay inside the
/// downloads directory.
fn sanitize_filename(filename: &str) -> Result<&str> {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::InvalidParameter(format!("invalid file name: {filename:?}")))
}
