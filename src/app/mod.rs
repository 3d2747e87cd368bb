//! Interactive terminal front-end.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: State transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Network work never runs on the UI thread: the model queues
//! [`Job`](crate::api::Job)s and the event loop hands them to a
//! [`FetchWorker`](crate::api::FetchWorker).

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{CARD_HEIGHT, CARD_MIN_WIDTH, Gallery, Model, Search};
pub use update::{Message, update};

use std::sync::Arc;

use crate::api::FetchClient;

/// Main application struct that owns the fetch client and runs the event loop.
pub struct App {
    client: Arc<dyn FetchClient + Send + Sync>,
    initial_query: Option<String>,
    images_enabled: bool,
    force_half_cell: bool,
}

impl App {
    /// Create a new application around an image API client.
    pub fn new(client: impl FetchClient + Send + Sync + 'static) -> Self {
        Self {
            client: Arc::new(client),
            initial_query: None,
            images_enabled: true,
            force_half_cell: false,
        }
    }

    /// Run this search as soon as the UI is up.
    pub fn with_initial_query(mut self, query: Option<String>) -> Self {
        self.initial_query = query.filter(|q| !q.trim().is_empty());
        self
    }

    /// Enable or disable full-size previews in the lightbox.
    pub const fn with_images_enabled(mut self, enabled: bool) -> Self {
        self.images_enabled = enabled;
        self
    }

    /// Force image rendering to use half-cell fallback mode.
    pub const fn with_force_half_cell(mut self, enabled: bool) -> Self {
        self.force_half_cell = enabled;
        self
    }
}

#[cfg(test)]
mod tests;
