//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - the card grid, search bar, status bar and toast stack
//! - help and image preview overlays

pub mod viewport;

mod overlays;
mod render;
mod status;

pub use render::render;
