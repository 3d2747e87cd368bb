// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchController)
    clippy::module_name_repetitions
)]

//! # pixgrid
//!
//! A terminal image-search gallery backed by the Pixabay API.
//!
//! pixgrid lets you:
//! - Search images by keyword and browse results as a card grid
//! - Load more results automatically as the last card scrolls into view
//! - Preview full-size images in the terminal (Kitty, Sixel, half-block fallback)
//! - Export a search to a standalone HTML gallery
//!
//! ## Architecture
//!
//! The terminal front-end uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! The search core is independent of the terminal and drives any
//! [`gallery::GalleryRenderer`] and [`notify::Notifier`].
//!
//! ## Modules
//!
//! - [`search`]: Query state, pagination and the fetch-then-render cycle
//! - [`api`]: Image API client and background fetch worker
//! - [`gallery`]: Card containers and HTML markup
//! - [`preview`]: Lightbox over the rendered cards
//! - [`notify`]: Toast notifications
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`image`]: Preview image decoding and rendering setup
//! - [`export`]: Batch HTML export
//! - [`config`]: Saved defaults

pub mod api;
pub mod app;
pub mod config;
pub mod export;
pub mod gallery;
pub mod image;
pub mod notify;
pub mod preview;
pub mod search;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{FetchClient, FetchError, ImageResult, PageRequest, ResultPage};
    pub use crate::app::{App, Message, Model};
    pub use crate::gallery::GalleryRenderer;
    pub use crate::notify::{Notifier, ToastLevel};
    pub use crate::search::{CycleOutcome, SearchController, SearchPhase};
    pub use crate::ui::viewport::Viewport;
}
