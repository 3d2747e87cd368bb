//! Blocking Pixabay client.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use super::{FetchClient, FetchError, PageRequest, ResultPage};

pub const DEFAULT_BASE_URL: &str = "https://pixabay.com/api/";
pub const DEFAULT_PER_PAGE: u32 = 40;
const MIN_PER_PAGE: u32 = 3;
const MAX_PER_PAGE: u32 = 200;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageType {
    All,
    #[default]
    Photo,
    Illustration,
    Vector,
}

impl ImageType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Photo => "photo",
            Self::Illustration => "illustration",
            Self::Vector => "vector",
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    All,
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Query parameters shared by every page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub image_type: ImageType,
    pub orientation: Orientation,
    pub safesearch: bool,
    pub per_page: u32,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            image_type: ImageType::default(),
            orientation: Orientation::default(),
            safesearch: true,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Set the page size, clamped to what the API accepts.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(MIN_PER_PAGE, MAX_PER_PAGE);
        self
    }
}

/// [`FetchClient`] backed by the Pixabay REST API.
#[derive(Debug, Clone)]
pub struct PixabayClient {
    http: Client,
    config: ApiConfig,
}

impl PixabayClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unavailable`] if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(concat!("pixgrid/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Full request URL for one page.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unavailable`] if the configured base URL is invalid.
    pub fn page_url(&self, request: &PageRequest) -> Result<Url, FetchError> {
        let page = request.page.to_string();
        let per_page = self.config.per_page.to_string();
        let params = [
            ("key", self.config.api_key.as_str()),
            ("q", request.query.as_str()),
            ("image_type", self.config.image_type.as_str()),
            ("orientation", self.config.orientation.as_str()),
            ("safesearch", if self.config.safesearch { "true" } else { "false" }),
            ("page", page.as_str()),
            ("per_page", per_page.as_str()),
        ];
        Url::parse_with_params(&self.config.base_url, params)
            .map_err(|e| FetchError::Unavailable(format!("bad base url: {e}")))
    }
}

impl FetchClient for PixabayClient {
    fn fetch_gallery(&self, request: &PageRequest) -> Result<ResultPage, FetchError> {
        let url = self.page_url(request)?;
        tracing::debug!(query = %request.query, page = request.page, "requesting page");

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        parse_page(&body)
    }

    fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

fn parse_page(body: &str) -> Result<ResultPage, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}
