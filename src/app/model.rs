use std::collections::HashSet;
use std::ops::Range;
use std::time::Instant;

use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::api::{FetchError, ImageResult, Job, PageRequest, ResultPage};
use crate::gallery::{CardGrid, GalleryRenderer, grid_rows};
use crate::image::{ImageCache, decode_image};
use crate::notify::{Notifier, ToastQueue};
use crate::preview::Lightbox;
use crate::search::visibility::ROOT_MARGIN;
use crate::search::{CycleOutcome, SearchController, intersection_ratio};
use crate::ui::viewport::Viewport;

/// Rows taken by one card, borders included.
pub const CARD_HEIGHT: u16 = 6;
/// Narrowest a card may get before the grid drops a column.
pub const CARD_MIN_WIDTH: u16 = 28;
/// Search bar plus status bar.
const CHROME_ROWS: u16 = 2;
/// Decoded previews kept around for quick back-and-forth navigation.
const PREVIEW_CACHE_SIZE: usize = 16;

pub type Gallery = CardGrid<Lightbox>;
pub type Search = SearchController<Gallery, ToastQueue>;

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Search controller owning query state, cards, watcher and toasts
    pub search: Search,
    /// Text in the search field
    pub input: String,
    /// Whether keystrokes go to the search field
    pub input_focused: bool,
    /// Viewport over grid rows
    pub viewport: Viewport,
    /// Selected card index
    pub selected: Option<usize>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Whether the preview downloads and draws full-size images
    pub images_enabled: bool,
    /// Image picker for terminal rendering
    pub picker: Option<Picker>,
    images: ImageCache,
    preview_protocol: Option<(String, StatefulProtocol)>,
    pending_images: HashSet<String>,
    jobs: Vec<Job>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("query", &self.search.state().query())
            .field("phase", &self.search.phase())
            .field("cards", &self.search.renderer().len())
            .field("selected", &self.selected)
            .field("input_focused", &self.input_focused)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new((80, 24))
    }
}

impl Model {
    /// Create a new model for a terminal of the given size.
    pub fn new(terminal_size: (u16, u16)) -> Self {
        Self {
            search: SearchController::new(CardGrid::new(Lightbox::new()), ToastQueue::default()),
            input: String::new(),
            input_focused: false,
            viewport: Viewport::new(
                terminal_size.0,
                terminal_size.1.saturating_sub(CHROME_ROWS),
                0,
            ),
            selected: None,
            help_visible: false,
            should_quit: false,
            images_enabled: true,
            picker: None,
            images: ImageCache::new(PREVIEW_CACHE_SIZE),
            preview_protocol: None,
            pending_images: HashSet::new(),
            jobs: Vec::new(),
        }
    }

    /// Set the image picker.
    #[must_use]
    pub fn with_picker(mut self, picker: Option<Picker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn cards(&self) -> &[ImageResult] {
        self.search.renderer().cards()
    }

    pub fn selected_card(&self) -> Option<&ImageResult> {
        self.selected.and_then(|idx| self.search.renderer().card(idx))
    }

    pub const fn lightbox(&self) -> &Lightbox {
        self.search.renderer().preview()
    }

    pub const fn toasts(&self) -> &ToastQueue {
        self.search.notifier()
    }

    pub(super) fn expire_toasts(&mut self, now: Instant) -> bool {
        self.search.notifier_mut().expire(now)
    }

    /// Whether the worker still owes us an answer.
    pub fn is_waiting(&self) -> bool {
        self.search.in_flight().is_some() || !self.pending_images.is_empty()
    }

    /// Jobs queued since the last call.
    pub fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.jobs)
    }

    // Grid geometry

    pub fn columns(&self) -> usize {
        usize::from((self.viewport.width() / CARD_MIN_WIDTH).max(1))
    }

    pub fn card_width(&self) -> u16 {
        #[allow(clippy::cast_possible_truncation)]
        let columns = self.columns() as u16;
        self.viewport.width() / columns
    }

    /// Grid rows covered by card `index`.
    pub fn card_rows(&self, index: usize) -> Range<usize> {
        let top = (index / self.columns()) * usize::from(CARD_HEIGHT);
        top..top + usize::from(CARD_HEIGHT)
    }

    pub(super) fn sync_layout(&mut self) {
        let rows = grid_rows(self.cards().len(), self.columns()) * usize::from(CARD_HEIGHT);
        self.viewport.set_total_rows(rows);
        if let Some(selected) = self.selected {
            let len = self.cards().len();
            self.selected = if len == 0 {
                None
            } else {
                Some(selected.min(len - 1))
            };
        }
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.viewport
            .resize(width, height.saturating_sub(CHROME_ROWS));
        self.sync_layout();
        self.keep_selection_visible();
    }

    // Search

    pub(super) fn submit_search(&mut self) {
        let raw = self.input.clone();
        if let Ok(request) = self.search.submit_search(&raw) {
            self.input = request.query.clone();
            self.input_focused = false;
            self.selected = None;
            self.preview_protocol = None;
            self.viewport.go_to_top();
            self.jobs.push(Job::Page(request));
        }
        self.sync_layout();
    }

    pub(super) fn apply_page(
        &mut self,
        request: PageRequest,
        result: Result<ResultPage, FetchError>,
    ) {
        let outcome = self.search.complete_fetch(request, result);
        tracing::debug!(?outcome, "fetch cycle finished");
        self.sync_layout();
        if self.selected.is_none()
            && !self.cards().is_empty()
            && !matches!(outcome, CycleOutcome::Stale)
        {
            self.selected = Some(0);
        }
    }

    /// Measure the watched card against the viewport and queue the next page
    /// when it scrolls into view.
    pub fn check_visibility(&mut self) {
        let Some(target) = self.search.watcher().target() else {
            return;
        };
        let ratio = intersection_ratio(
            self.card_rows(target),
            self.viewport.visible_range(),
            ROOT_MARGIN,
        );
        if let Some(request) = self.search.on_visibility(ratio) {
            self.jobs.push(Job::Page(request));
        }
    }

    // Selection

    pub(super) fn move_selection(&mut self, columns: isize, rows: isize) {
        let len = self.cards().len();
        if len == 0 {
            return;
        }
        let Some(current) = self.selected else {
            self.selected = Some(0);
            self.keep_selection_visible();
            return;
        };
        let step = columns + rows * isize::try_from(self.columns()).unwrap_or(1);
        let next = current.saturating_add_signed(step).min(len - 1);
        self.selected = Some(next);
        self.keep_selection_visible();
    }

    pub(super) fn keep_selection_visible(&mut self) {
        if let Some(selected) = self.selected {
            let rows = self.card_rows(selected);
            self.viewport.reveal(rows);
        }
    }

    // Preview

    pub(super) fn open_preview(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        if self.search.renderer_mut().preview_mut().open(selected) {
            self.request_preview_image();
        }
    }

    pub(super) fn close_preview(&mut self) {
        self.search.renderer_mut().preview_mut().close();
        self.preview_protocol = None;
    }

    pub(super) fn step_preview(&mut self, forward: bool) {
        let lightbox = self.search.renderer_mut().preview_mut();
        if forward {
            lightbox.next();
        } else {
            lightbox.prev();
        }
        self.selected = self.lightbox().current_index();
        self.keep_selection_visible();
        self.request_preview_image();
    }

    /// Protocol for the image currently shown in the preview, if decoded.
    pub fn preview_protocol_mut(&mut self) -> Option<&mut StatefulProtocol> {
        let current = self.search.renderer().preview().current_link()?;
        match self.preview_protocol.as_mut() {
            Some((url, protocol)) if url.as_str() == current => Some(protocol),
            _ => None,
        }
    }

    pub fn preview_loading(&self) -> bool {
        self.lightbox()
            .current_link()
            .is_some_and(|url| self.pending_images.contains(url))
    }

    fn request_preview_image(&mut self) {
        if !self.images_enabled || self.picker.is_none() {
            return;
        }
        let Some(url) = self.lightbox().current_link().map(str::to_string) else {
            return;
        };
        if self.images.contains(&url) {
            self.build_preview_protocol(&url);
        } else if self.pending_images.insert(url.clone()) {
            self.jobs.push(Job::Image(url));
        }
    }

    pub(super) fn apply_image(&mut self, url: &str, result: Result<Vec<u8>, FetchError>) {
        self.pending_images.remove(url);
        let decoded = match result {
            Ok(bytes) => decode_image(&bytes).map_err(|e| e.to_string()),
            Err(err) => Err(err.to_string()),
        };
        match decoded {
            Ok(image) => {
                self.images.insert(url.to_string(), image);
                if self.lightbox().current_link() == Some(url) {
                    self.build_preview_protocol(url);
                }
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "preview image unavailable");
                self.search
                    .notifier_mut()
                    .warning(&format!("Preview unavailable: {err}"));
            }
        }
    }

    fn build_preview_protocol(&mut self, url: &str) {
        if self
            .preview_protocol
            .as_ref()
            .is_some_and(|(current, _)| current == url)
        {
            return;
        }
        let (Some(picker), Some(image)) = (self.picker.as_ref(), self.images.get(url)) else {
            return;
        };
        let protocol = picker.new_resize_protocol(image.clone());
        self.preview_protocol = Some((url.to_string(), protocol));
    }
}
