// SPDX-License-Identifier: MPL-2.0
//! HTTP transport for the image service.
//!
//! Two `reqwest` clients share the base URL. Metadata requests (lists,
//! favorites, deletion, upload, raw images) use a bounded timeout.
//! Processing requests (filters, objects overlay) can run for a long time on
//! the server and carry no timeout unless one is configured.
//!
//! No request is retried.

use crate::application::port::{RemoteError, UploadFile};
use crate::domain::blob::{Blob, DEFAULT_CONTENT_TYPE};
use crate::error::{Error, Result};
use crate::infrastructure::http::routes::Route;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("GalleryLens/", env!("CARGO_PKG_VERSION"));

/// Which client a request goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Bounded timeout.
    Metadata,
    /// Unbounded unless configured.
    Processing,
}

/// Connection settings for [`RemoteClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL every route is resolved against.
    pub base_url: String,
    /// Timeout of metadata requests.
    pub timeout: Duration,
    /// Optional timeout of processing requests.
    pub processing_timeout: Option<Duration>,
}

/// HTTP client for the image service.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base: Url,
    metadata: reqwest::Client,
    processing: reqwest::Client,
}

impl RemoteClient {
    /// Builds both transports.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL is invalid or a client
    /// cannot be built.
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let base = parse_base_url(&settings.base_url)?;

        let metadata = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let mut processing = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(settings.timeout);
        if let Some(timeout) = settings.processing_timeout {
            processing = processing.timeout(timeout);
        }
        let processing = processing
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        log::debug!(
            "Remote client for {base} (timeout {:?}, processing timeout {:?})",
            settings.timeout,
            settings.processing_timeout
        );
        Ok(Self {
            base,
            metadata,
            processing,
        })
    }

    /// Base URL routes are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(
        &self,
        transport: Transport,
        method: Method,
        route: &Route,
    ) -> std::result::Result<RequestBuilder, RemoteError> {
        let url = self
            .base
            .join(route.path())
            .map_err(|e| RemoteError::Request(format!("{route}: {e}")))?;
        let client = match transport {
            Transport::Metadata => &self.metadata,
            Transport::Processing => &self.processing,
        };
        let builder = client.request(method, url);
        Ok(if route.query().is_empty() {
            builder
        } else {
            builder.query(route.query())
        })
    }

    /// Sends a request and turns non-2xx answers into errors.
    async fn send(
        &self,
        route: &Route,
        builder: RequestBuilder,
    ) -> std::result::Result<Response, RemoteError> {
        log::debug!("Sending {route}");
        let response = builder
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // Best effort: the body usually carries the server's explanation.
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    /// GET a JSON document.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        route: &Route,
    ) -> std::result::Result<T, RemoteError> {
        let builder = self.request(Transport::Metadata, Method::GET, route)?;
        let response = self.send(route, builder).await?;
        let body = read_body(response).await?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(format!("{route}: {e}")))
    }

    /// GET a binary payload with its declared content type.
    pub async fn get_binary(
        &self,
        transport: Transport,
        route: &Route,
    ) -> std::result::Result<Blob, RemoteError> {
        let builder = self.request(transport, Method::GET, route)?;
        let response = self.send(route, builder).await?;
        let content_type = content_type_of(response.headers());
        let body = read_body(response).await?;
        Ok(Blob::new(body, content_type))
    }

    /// POST without a body.
    pub async fn post(&self, route: &Route) -> std::result::Result<(), RemoteError> {
        let builder = self.request(Transport::Metadata, Method::POST, route)?;
        self.send(route, builder).await.map(drop)
    }

    pub async fn delete(&self, route: &Route) -> std::result::Result<(), RemoteError> {
        let builder = self.request(Transport::Metadata, Method::DELETE, route)?;
        self.send(route, builder).await.map(drop)
    }

    /// POST `file` as the multipart field `file`.
    pub async fn upload_multipart(
        &self,
        route: &Route,
        file: &UploadFile,
    ) -> std::result::Result<(), RemoteError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| RemoteError::Request(format!("{}: {e}", file.content_type)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let builder = self
            .request(Transport::Metadata, Method::POST, route)?
            .multipart(form);
        self.send(route, builder).await.map(drop)
    }
}

/// Parses the base URL, making sure relative routes append to its path.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized).map_err(|e| Error::Config(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("{raw}: not a base URL")));
    }
    Ok(url)
}

fn status_error(status: StatusCode, body: &str) -> RemoteError {
    let body = body.trim();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("Unknown status").to_string()
    } else {
        body.to_string()
    };
    RemoteError::Status {
        status: status.as_u16(),
        message,
    }
}

fn content_type_of(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

async fn read_body(response: Response) -> std::result::Result<Vec<u8>, RemoteError> {
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0);
    let mut body = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| RemoteError::Network(e.to_string()))?;
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
