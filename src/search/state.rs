/// Page number the image API starts at.
pub const INITIAL_PAGE: u32 = 1;

/// Where the active search is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Nothing loaded yet (startup, or the first page failed)
    #[default]
    Idle,
    FirstPageLoading,
    /// At least one page rendered, watcher attached
    PageLoaded,
    NextPageLoading,
    /// Every match rendered; terminal
    Exhausted,
    /// The API returned no items; terminal
    EmptyResult,
}

impl SearchPhase {
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::FirstPageLoading | Self::NextPageLoading)
    }
}

/// Query and pagination state for the active search.
///
/// Created once, owned by the controller, and reset as a whole whenever a new
/// search is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    query: String,
    page_cursor: u32,
    shown: usize,
    total_matches: usize,
    first_result_announced: bool,
    generation: u64,
    phase: SearchPhase,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page_cursor: INITIAL_PAGE,
            shown: 0,
            total_matches: 0,
            first_result_announced: false,
            generation: 0,
            phase: SearchPhase::Idle,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active query; empty before the first accepted search.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Next page to request.
    pub const fn page_cursor(&self) -> u32 {
        self.page_cursor
    }

    /// Items rendered for the active query.
    pub const fn shown(&self) -> usize {
        self.shown
    }

    /// Total reported by the most recent successful page.
    pub const fn total_matches(&self) -> usize {
        self.total_matches
    }

    pub const fn first_result_announced(&self) -> bool {
        self.first_result_announced
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub const fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Replace the query and reset every per-search field.
    pub(super) fn begin(&mut self, query: String) {
        self.query = query;
        self.page_cursor = INITIAL_PAGE;
        self.shown = 0;
        self.total_matches = 0;
        self.first_result_announced = false;
        self.generation += 1;
        self.phase = SearchPhase::FirstPageLoading;
    }

    pub(super) const fn set_phase(&mut self, phase: SearchPhase) {
        self.phase = phase;
    }

    pub(super) const fn mark_announced(&mut self) {
        self.first_result_announced = true;
    }

    /// Record a rendered page and move the cursor past it.
    pub(super) const fn record_page(&mut self, page: u32, rendered: usize, total_matches: usize) {
        self.shown += rendered;
        self.total_matches = total_matches;
        self.page_cursor = page + 1;
    }

    pub const fn is_exhausted(&self) -> bool {
        self.shown >= self.total_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_and_empty() {
        let state = QueryState::new();
        assert_eq!(state.query(), "");
        assert_eq!(state.page_cursor(), INITIAL_PAGE);
        assert_eq!(state.shown(), 0);
        assert_eq!(state.generation(), 0);
        assert_eq!(state.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_begin_resets_all_per_search_fields() {
        let mut state = QueryState::new();
        state.begin("cats".to_string());
        state.record_page(1, 20, 100);
        state.record_page(2, 20, 100);
        state.mark_announced();
        state.set_phase(SearchPhase::PageLoaded);

        state.begin("dogs".to_string());
        assert_eq!(state.query(), "dogs");
        assert_eq!(state.page_cursor(), INITIAL_PAGE);
        assert_eq!(state.shown(), 0);
        assert_eq!(state.total_matches(), 0);
        assert!(!state.first_result_announced());
        assert_eq!(state.generation(), 2);
        assert_eq!(state.phase(), SearchPhase::FirstPageLoading);
    }

    #[test]
    fn test_record_page_advances_cursor_past_loaded_page() {
        let mut state = QueryState::new();
        state.begin("cats".to_string());
        state.record_page(1, 20, 45);
        assert_eq!(state.page_cursor(), 2);
        assert_eq!(state.shown(), 20);
        assert!(!state.is_exhausted());
        state.record_page(2, 25, 45);
        assert!(state.is_exhausted());
    }

    #[test]
    fn test_loading_phases() {
        assert!(SearchPhase::FirstPageLoading.is_loading());
        assert!(SearchPhase::NextPageLoading.is_loading());
        assert!(!SearchPhase::PageLoaded.is_loading());
        assert!(!SearchPhase::Exhausted.is_loading());
    }
}
