//! Non-interactive HTML export.
//!
//! Drives the same [`SearchController`] as the terminal UI, but fetches on the
//! calling thread and asks for further pages directly instead of waiting for a
//! scroll.

use crate::api::FetchClient;
use crate::gallery::HtmlGallery;
use crate::notify::Notifier;
use crate::preview::NoPreview;
use crate::search::{CycleOutcome, InputError, SearchController};

/// Result of an export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Standalone HTML page
    pub document: String,
    /// Pages requested, including failed ones
    pub pages: u32,
    pub shown: usize,
    pub total_matches: usize,
    /// How the last fetch cycle ended
    pub outcome: CycleOutcome,
}

/// Search for `query` and collect up to `max_pages` pages into one document.
///
/// Stops early when results run out or a page fails; a failed page is not
/// retried.
///
/// # Errors
///
/// Returns [`InputError::Empty`] for a blank query.
pub fn export_html<C, N>(
    client: &C,
    notifier: N,
    query: &str,
    max_pages: u32,
) -> Result<Export, InputError>
where
    C: FetchClient + ?Sized,
    N: Notifier,
{
    let mut search = SearchController::new(HtmlGallery::new(NoPreview), notifier);
    let first = search.submit_search(query)?;
    let mut outcome = search.run_fetch_cycle(client, first);
    let mut pages = 1;

    while pages < max_pages && !matches!(outcome, CycleOutcome::Faulted(_)) {
        let Some(next) = search.handle_reached_end() else {
            break;
        };
        outcome = search.run_fetch_cycle(client, next);
        pages += 1;
    }
    tracing::debug!(query, pages, ?outcome, "export finished");

    let state = search.state();
    Ok(Export {
        document: search
            .renderer()
            .document(&format!("{} - pixgrid", state.query())),
        pages,
        shown: state.shown(),
        total_matches: state.total_matches(),
        outcome,
    })
}
