//! REST API client for the TubeScribe backend.
//!
//! Wraps the HTTP endpoints (video listing, batch submission, deletion,
//! category listing) using [`reqwest`]. The store treats this as an
//! opaque fetch/command boundary.

use serde::Deserialize;
use tubescribe_core::types::{Category, VideoId, VideoRecord};

/// HTTP client for one TubeScribe backend.
pub struct VideosApi {
    client: reqwest::Client,
    api_url: String,
}

/// Response returned by `POST /videos` after queuing a batch of URLs.
#[derive(Debug, Deserialize)]
pub struct AddVideosResponse {
    /// The newly created records, already in `queued` state.
    pub videos: Vec<VideoRecord>,
}

/// Errors from the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl VideosApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:5000/api`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Fetch the full current video collection.
    ///
    /// Sends a `GET /videos` request, optionally scoped to one category
    /// via the `category_id` query parameter.
    pub async fn list_videos(
        &self,
        category_id: Option<VideoId>,
    ) -> Result<Vec<VideoRecord>, ApiError> {
        let mut request = self.client.get(format!("{}/videos", self.api_url));
        if let Some(id) = category_id {
            request = request.query(&[("category_id", id)]);
        }

        let response = request.send().await?;
        Self::parse_response(response).await
    }

    /// Submit one or more video URLs as a single batch.
    ///
    /// Sends a `POST /videos` request. The batch fails as a unit -- on a
    /// non-2xx response no records are assumed created.
    pub async fn add_videos(&self, urls: &[String]) -> Result<Vec<VideoRecord>, ApiError> {
        let body = serde_json::json!({ "urls": urls });

        let response = self
            .client
            .post(format!("{}/videos", self.api_url))
            .json(&body)
            .send()
            .await?;

        let parsed: AddVideosResponse = Self::parse_response(response).await?;
        Ok(parsed.videos)
    }

    /// Delete a video by id.
    ///
    /// Sends a `DELETE /videos/{id}` request.
    pub async fn delete_video(&self, id: VideoId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/videos/{}", self.api_url, id))
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Fetch all categories.
    ///
    /// Sends a `GET /categories` request.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self
            .client
            .get(format!("{}/categories", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Api`] with the
    /// status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
