use crate::api::{FetchError, PageRequest, ResultPage};
use crate::app::Model;
use crate::app::model::CARD_HEIGHT;

/// All possible events and actions in the application.
///
/// These represent user input, worker results, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Scroll up by n rows
    ScrollUp(usize),
    /// Scroll down by n rows
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Go to the first card
    GoToTop,
    /// Go to the last loaded card
    GoToBottom,

    // Selection
    SelectLeft,
    SelectRight,
    SelectUp,
    SelectDown,
    /// Select a card by index (mouse click)
    SelectCard(usize),

    // Search field
    /// Move keyboard focus to the search field
    FocusSearch,
    /// Leave the search field without submitting
    BlurSearch,
    /// Type a character into the search field
    SearchInput(char),
    /// Delete the last character of the search field
    SearchBackspace,
    /// Empty the search field
    SearchClearInput,
    /// Submit the search field
    SubmitSearch,

    // Preview
    /// Open the lightbox on the selected card
    OpenPreview,
    ClosePreview,
    PreviewNext,
    PreviewPrev,
    /// Open the selected image's page in the system browser
    OpenInBrowser,
    /// Copy the selected image's link to the clipboard
    CopyLink,

    // Worker results
    /// A gallery page request finished
    PageLoaded(PageRequest, Result<ResultPage, FetchError>),
    /// A full-size preview download finished
    ImageLoaded(String, Result<Vec<u8>, FetchError>),

    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Network and terminal side effects are queued or handled by the event
/// loop, never performed here.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Navigation
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => {
            model.viewport.scroll_down(n);
            model.search.rearm_watcher();
        }
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => {
            model.viewport.page_down();
            model.search.rearm_watcher();
        }
        Message::GoToTop => {
            model.viewport.go_to_top();
            if !model.cards().is_empty() {
                model.selected = Some(0);
            }
        }
        Message::GoToBottom => {
            model.viewport.go_to_bottom();
            model.selected = model.cards().len().checked_sub(1);
            model.search.rearm_watcher();
        }

        // Selection
        Message::SelectLeft => model.move_selection(-1, 0),
        Message::SelectRight => model.move_selection(1, 0),
        Message::SelectUp => model.move_selection(0, -1),
        Message::SelectDown => {
            let before = model.selected;
            model.move_selection(0, 1);
            // Last row: keep scrolling so the watched card can come into view.
            if before.is_some() && before == model.selected {
                model.viewport.scroll_down(usize::from(CARD_HEIGHT));
            }
            model.search.rearm_watcher();
        }
        Message::SelectCard(index) => {
            if index < model.cards().len() {
                model.selected = Some(index);
                model.keep_selection_visible();
            }
        }

        // Search field
        Message::FocusSearch => model.input_focused = true,
        Message::BlurSearch => model.input_focused = false,
        Message::SearchInput(c) => model.input.push(c),
        Message::SearchBackspace => {
            model.input.pop();
        }
        Message::SearchClearInput => model.input.clear(),
        Message::SubmitSearch => model.submit_search(),

        // Preview
        Message::OpenPreview => model.open_preview(),
        Message::ClosePreview => model.close_preview(),
        Message::PreviewNext => model.step_preview(true),
        Message::PreviewPrev => model.step_preview(false),
        // Handled by the event loop
        Message::OpenInBrowser | Message::CopyLink | Message::Redraw => {}

        // Worker results
        Message::PageLoaded(request, result) => model.apply_page(request, result),
        Message::ImageLoaded(url, result) => model.apply_image(&url, result),

        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,

        Message::Resize(width, height) => model.resize(width, height),

        Message::Quit => model.should_quit = true,
    }
    model
}
