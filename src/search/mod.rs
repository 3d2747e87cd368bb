//! Search orchestration.
//!
//! - [`QueryState`]: active query, page cursor and shown count
//! - [`SearchController`]: validation, reset, and the fetch-then-render cycle
//! - [`VisibilityWatcher`]: scroll trigger for the next page

mod controller;
mod state;
pub mod visibility;

pub use controller::SearchController;
pub use state::{INITIAL_PAGE, QueryState, SearchPhase};
pub use visibility::{VisibilityWatcher, intersection_ratio};

use thiserror::Error;

use crate::api::FetchError;

/// Literal texts shown to the user.
pub mod messages {
    pub const EMPTY_QUERY: &str = "Please fill in the search field.";
    pub const REPEATED_QUERY: &str = "Please change the query or enter a new one.";
    pub const NO_MATCHES: &str =
        "Sorry, there are no images matching your search query. Please try again.";
    pub const END_OF_RESULTS: &str = "You've reached the end of search results.";
    pub const FETCH_FAILED: &str = "Something went wrong while loading the gallery.";

    pub fn found(total: usize) -> String {
        format!("Hooray! We found {total} images!")
    }
}

/// Search input that was rejected before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{}", messages::EMPTY_QUERY)]
    Empty,
    #[error("{}", messages::REPEATED_QUERY)]
    Repeated,
}

/// How a fetch cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Cards appended; more pages remain
    Rendered {
        added: usize,
        shown: usize,
        total: usize,
    },
    /// Cards appended and every match is now shown
    Exhausted { shown: usize },
    /// The page had no items
    EmptyResult,
    /// The client failed; nothing changed on screen
    Faulted(FetchError),
    /// The answer belonged to an older search and was dropped
    Stale,
}
