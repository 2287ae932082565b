// SPDX-License-Identifier: MPL-2.0
//! Request paths of the image service.
//!
//! Paths are relative to the configured base URL. Query values are kept
//! unencoded here; the HTTP client encodes them when the request is built.

use crate::domain::gallery::{FetchMode, ImageId};
use crate::domain::processing::FilterOp;
use crate::domain::similarity::SimilarityQuery;
use std::fmt;

/// A relative path plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    path: String,
    query: Vec<(&'static str, String)>,
}

impl Route {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// Gallery list for a fetch mode.
    #[must_use]
    pub fn list(mode: &FetchMode) -> Self {
        match mode {
            FetchMode::All => Self::new("images"),
            FetchMode::Favorites => Self::new("images/favorites"),
            FetchMode::Search(tag) => Self::new("images/search").with("tag", tag),
        }
    }

    /// Images similar to `id`.
    #[must_use]
    pub fn similar(id: ImageId, query: SimilarityQuery) -> Self {
        Self::new(format!("images/{id}/similar"))
            .with("number", query.count)
            .with("descriptor", query.descriptor.as_param())
    }

    /// Favorite toggle (POST).
    #[must_use]
    pub fn toggle_favorite(id: ImageId) -> Self {
        Self::new("images/favorites").with("id", id)
    }

    /// One image: raw bytes (GET) or deletion (DELETE).
    #[must_use]
    pub fn image(id: ImageId) -> Self {
        Self::new(format!("images/{id}"))
    }

    /// Upload target (multipart POST).
    #[must_use]
    pub fn upload() -> Self {
        Self::new("images")
    }

    /// Rendering of `id` with its recognised objects.
    #[must_use]
    pub fn objects(id: ImageId) -> Self {
        Self::new(format!("images/{id}/objects"))
    }

    /// Filtered rendering of `id`.
    ///
    /// Parameterless filters use `filter`, the others `filter_param`.
    #[must_use]
    pub fn filter(id: ImageId, op: FilterOp) -> Self {
        match op.parameter() {
            None => Self::new(format!("images/{id}/filter")).with("name", op.kind()),
            Some(param) => Self::new(format!("images/{id}/filter_param"))
                .with("name", op.kind())
                .with("param", param),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (index, (key, value)) in self.query.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            write!(f, "{separator}{key}={value}")?;
        }
        Ok(())
    }
}
