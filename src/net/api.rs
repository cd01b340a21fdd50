//! REST adapter for the item server.
//!
//! DESIGN
//! ======
//! `ItemApi` is the seam between the gallery controller and the network so
//! tests can swap in a recording mock. `HttpItemApi` is the production
//! implementation over `reqwest`. Response bodies of mutations are ignored;
//! only the status is inspected.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx statuses are surfaced as [`ApiError::Status`] so the controller
//! can raise a notice. The controller still resyncs either way.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::multipart::{Form, Part};

use super::types::{DescriptionPatch, Item, ItemId};
use super::upload::ImageUpload;
use crate::config::GalleryConfig;

/// Errors produced by item API calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}")]
    Status { status: u16, body: String },

    /// The list payload was not a JSON array of items.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// A request URL could not be built from the base URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// The four calls of the item HTTP contract.
#[async_trait]
pub trait ItemApi: Send + Sync {
    /// `GET /items`
    async fn list_items(&self) -> Result<Vec<Item>, ApiError>;

    /// `POST /items` with a multipart body of `image` and `description`.
    async fn create_item(&self, image: &ImageUpload, description: &str) -> Result<(), ApiError>;

    /// `PUT /items/{id}` with JSON `{"description": ...}`.
    async fn update_item(&self, id: &ItemId, description: &str) -> Result<(), ApiError>;

    /// `DELETE /items/{id}`
    async fn delete_item(&self, id: &ItemId) -> Result<(), ApiError>;
}

/// `reqwest`-backed [`ItemApi`].
pub struct HttpItemApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpItemApi {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &GalleryConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn items_url(&self) -> Result<Url, ApiError> {
        let raw = format!("{}/items", self.base_url);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// `{base}/items/{id}` with the id percent-encoded as one path segment.
    fn item_url(&self, id: &ItemId) -> Result<Url, ApiError> {
        let mut url = self.items_url()?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
            .push(&id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl ItemApi for HttpItemApi {
    async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
        let url = self.items_url()?;
        tracing::debug!(%url, "GET items");
        let response = send(self.http.get(url)).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        serde_json::from_str::<Vec<Item>>(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create_item(&self, image: &ImageUpload, description: &str) -> Result<(), ApiError> {
        let url = self.items_url()?;
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let form = Form::new()
            .part("image", part)
            .text("description", description.to_owned());
        tracing::debug!(%url, file = %image.file_name, bytes = image.len(), "POST item");
        send(self.http.post(url).multipart(form)).await?;
        Ok(())
    }

    async fn update_item(&self, id: &ItemId, description: &str) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        let body = DescriptionPatch { description: description.to_owned() };
        tracing::debug!(%url, "PUT item");
        send(self.http.put(url).json(&body)).await?;
        Ok(())
    }

    async fn delete_item(&self, id: &ItemId) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "DELETE item");
        send(self.http.delete(url)).await?;
        Ok(())
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Request(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status: status.as_u16(), body })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
