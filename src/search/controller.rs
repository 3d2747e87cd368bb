use tracing::{debug, error, warn};

use crate::api::{FetchClient, FetchError, PageRequest, ResultPage};
use crate::gallery::GalleryRenderer;
use crate::notify::Notifier;

use super::messages;
use super::state::{QueryState, SearchPhase};
use super::visibility::VisibilityWatcher;
use super::{CycleOutcome, InputError};

/// Drives searches and scroll-triggered pagination.
///
/// The controller never performs I/O itself: accepted searches and visibility
/// events produce a [`PageRequest`], and the answer comes back through
/// [`complete_fetch`](Self::complete_fetch). [`run_fetch_cycle`](Self::run_fetch_cycle)
/// combines both for synchronous callers.
#[derive(Debug)]
pub struct SearchController<R, N> {
    state: QueryState,
    watcher: VisibilityWatcher,
    renderer: R,
    notifier: N,
    in_flight: Option<PageRequest>,
}

impl<R: GalleryRenderer, N: Notifier> SearchController<R, N> {
    pub fn new(renderer: R, notifier: N) -> Self {
        Self {
            state: QueryState::new(),
            watcher: VisibilityWatcher::default(),
            renderer,
            notifier,
            in_flight: None,
        }
    }

    pub const fn state(&self) -> &QueryState {
        &self.state
    }

    pub const fn phase(&self) -> SearchPhase {
        self.state.phase()
    }

    pub const fn watcher(&self) -> &VisibilityWatcher {
        &self.watcher
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    pub const fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Request waiting for an answer, if any.
    pub const fn in_flight(&self) -> Option<&PageRequest> {
        self.in_flight.as_ref()
    }

    /// Validate `raw_input` and start a new search.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for blank or repeated queries. The matching
    /// warning has already been shown and no state was touched.
    pub fn submit_search(&mut self, raw_input: &str) -> Result<PageRequest, InputError> {
        let query = raw_input.trim();
        let rejection = if query.is_empty() {
            Some(InputError::Empty)
        } else if query == self.state.query() {
            Some(InputError::Repeated)
        } else {
            None
        };
        if let Some(err) = rejection {
            warn!(query, %err, "search rejected");
            self.notifier.warning(&err.to_string());
            return Err(err);
        }

        self.renderer.clear();
        self.watcher.reset();
        self.state.begin(query.to_string());
        let request = self.request_for_cursor();
        debug!(query, generation = request.generation, "search accepted");
        self.in_flight = Some(request.clone());
        Ok(request)
    }

    /// The last card became visible: ask for the next page.
    ///
    /// Does nothing unless a page is loaded and no request is outstanding.
    pub fn handle_reached_end(&mut self) -> Option<PageRequest> {
        if self.state.phase() != SearchPhase::PageLoaded || self.in_flight.is_some() {
            return None;
        }
        self.state.set_phase(SearchPhase::NextPageLoading);
        let request = self.request_for_cursor();
        debug!(
            query = %request.query,
            page = request.page,
            "reached end of gallery"
        );
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Feed the visible fraction of the watched card.
    pub fn on_visibility(&mut self, ratio: f32) -> Option<PageRequest> {
        if self.watcher.update(ratio) {
            self.handle_reached_end()
        } else {
            None
        }
    }

    /// The user moved towards the end of the gallery.
    ///
    /// Lets a last card that never left the screen trigger again, which is
    /// how a failed page gets asked for a second time.
    pub fn rearm_watcher(&mut self) {
        if self.state.phase() == SearchPhase::PageLoaded && self.in_flight.is_none() {
            self.watcher.rearm();
        }
    }

    /// Fetch `request` with `client` and finish the cycle.
    pub fn run_fetch_cycle<C>(&mut self, client: &C, request: PageRequest) -> CycleOutcome
    where
        C: FetchClient + ?Sized,
    {
        let result = client.fetch_gallery(&request);
        self.complete_fetch(request, result)
    }

    /// Finish the cycle started by `request`.
    pub fn complete_fetch(
        &mut self,
        request: PageRequest,
        result: Result<ResultPage, FetchError>,
    ) -> CycleOutcome {
        if request.generation != self.state.generation() {
            warn!(
                query = %request.query,
                page = request.page,
                stale = request.generation,
                current = self.state.generation(),
                "discarding result for superseded search"
            );
            return CycleOutcome::Stale;
        }
        if self.in_flight.as_ref() == Some(&request) {
            self.in_flight = None;
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => return self.fail(&request, &err),
        };

        if page.items.is_empty() {
            debug!(query = %request.query, page = request.page, "no items");
            self.notifier.error(messages::NO_MATCHES);
            self.state.set_phase(SearchPhase::EmptyResult);
            return CycleOutcome::EmptyResult;
        }

        if !self.state.first_result_announced() {
            if self.state.shown() < page.total_matches {
                self.notifier.success(&messages::found(page.total_matches));
            }
            self.state.mark_announced();
        }

        let added = page.items.len();
        let last = self.renderer.render(&page.items);
        self.state
            .record_page(request.page, added, page.total_matches);
        if let Some(last) = last {
            self.watcher.observe(last);
        }
        debug!(
            query = %request.query,
            page = request.page,
            added,
            shown = self.state.shown(),
            total = page.total_matches,
            "page rendered"
        );

        if self.state.is_exhausted() {
            self.watcher.disconnect_all();
            self.notifier.info(messages::END_OF_RESULTS);
            self.state.set_phase(SearchPhase::Exhausted);
            return CycleOutcome::Exhausted {
                shown: self.state.shown(),
            };
        }

        self.state.set_phase(SearchPhase::PageLoaded);
        CycleOutcome::Rendered {
            added,
            shown: self.state.shown(),
            total: page.total_matches,
        }
    }

    fn fail(&mut self, request: &PageRequest, err: &FetchError) -> CycleOutcome {
        error!(
            query = %request.query,
            page = request.page,
            error = %err,
            "failed to fetch gallery"
        );
        self.notifier.error(messages::FETCH_FAILED);
        let fallback = if self.state.phase() == SearchPhase::FirstPageLoading {
            SearchPhase::Idle
        } else {
            SearchPhase::PageLoaded
        };
        self.state.set_phase(fallback);
        CycleOutcome::Faulted(err.clone())
    }

    fn request_for_cursor(&self) -> PageRequest {
        PageRequest {
            generation: self.state.generation(),
            query: self.state.query().to_string(),
            page: self.state.page_cursor(),
        }
    }
}
