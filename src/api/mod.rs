//! Image API client contract and payload types.
//!
//! The search core only relies on [`FetchClient`]; the wire protocol lives in
//! [`pixabay`] and the background dispatch in [`worker`].

mod pixabay;
mod worker;

pub use pixabay::{ApiConfig, ImageType, Orientation, PixabayClient};
pub use worker::{FetchWorker, Job, WorkerEvent};

use serde::Deserialize;
use thiserror::Error;

/// One image hit returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ImageResult {
    /// Medium-sized preview used for grid cards
    #[serde(rename = "webformatURL")]
    pub thumbnail_url: String,
    /// Full-size image opened by the preview
    #[serde(rename = "largeImageURL")]
    pub full_image_url: String,
    /// Comma-separated tag list, used as alt text
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub downloads: u64,
}

/// A page of results plus the number of matches the API will serve.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ResultPage {
    #[serde(rename = "hits")]
    pub items: Vec<ImageResult>,
    #[serde(rename = "totalHits")]
    pub total_matches: usize,
}

/// A request for one page of one search.
///
/// `generation` identifies the accepted search that issued the request so a
/// late answer for an older search can be recognized and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub query: String,
    pub page: u32,
}

/// Failure while talking to the image API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("client unavailable: {0}")]
    Unavailable(String),
}

/// Source of result pages and image bytes.
///
/// Implementations block until the answer is available; callers that must not
/// block hand requests to a [`FetchWorker`].
pub trait FetchClient {
    /// Fetch one page of results for `request.query`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on transport, status, or decode failures.
    fn fetch_gallery(&self, request: &PageRequest) -> Result<ResultPage, FetchError>;

    /// Download raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the image cannot be downloaded.
    fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<C: FetchClient + ?Sized> FetchClient for std::sync::Arc<C> {
    fn fetch_gallery(&self, request: &PageRequest) -> Result<ResultPage, FetchError> {
        (**self).fetch_gallery(request)
    }

    fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_image(url)
    }
}
