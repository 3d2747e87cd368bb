use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::model::CARD_HEIGHT;
use crate::app::{App, Message, Model};

use super::event_loop::ResizeDebouncer;

/// Rows scrolled per mouse wheel notch.
const WHEEL_ROWS: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.lightbox().is_open() {
            return None;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_ROWS)),
            MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_ROWS)),
            MouseEventKind::Up(MouseButton::Left) if mouse.row == 0 => Some(Message::FocusSearch),
            MouseEventKind::Up(MouseButton::Left) => {
                card_at(model, mouse.column, mouse.row).map(Message::SelectCard)
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Message::Quit);
        }

        if model.help_visible {
            return Some(Message::HideHelp);
        }

        if model.lightbox().is_open() {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(Message::ClosePreview),
                KeyCode::Right | KeyCode::Char('l' | 'n') | KeyCode::Char(' ') => {
                    Some(Message::PreviewNext)
                }
                KeyCode::Left | KeyCode::Char('h' | 'N' | 'p') | KeyCode::Backspace => {
                    Some(Message::PreviewPrev)
                }
                KeyCode::Char('o') => Some(Message::OpenInBrowser),
                KeyCode::Char('y') => Some(Message::CopyLink),
                _ => None,
            };
        }

        if model.input_focused {
            return match key.code {
                KeyCode::Enter => Some(Message::SubmitSearch),
                KeyCode::Esc => Some(Message::BlurSearch),
                KeyCode::Backspace => Some(Message::SearchBackspace),
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::SearchClearInput)
                }
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    Some(Message::SearchInput(c))
                }
                _ => None,
            };
        }

        match key.code {
            // Selection
            KeyCode::Char('h') | KeyCode::Left => Some(Message::SelectLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Message::SelectRight),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectDown),

            // Scrolling
            KeyCode::Char(' ') | KeyCode::PageDown => Some(Message::PageDown),
            KeyCode::Char('b') | KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),

            // Search
            KeyCode::Char('/' | 's') => Some(Message::FocusSearch),

            // Preview
            KeyCode::Enter | KeyCode::Char('p') if model.selected.is_some() => {
                Some(Message::OpenPreview)
            }
            KeyCode::Char('o') if model.selected.is_some() => Some(Message::OpenInBrowser),
            KeyCode::Char('y') if model.selected.is_some() => Some(Message::CopyLink),

            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Card under a click, given that the gallery starts below the search bar.
fn card_at(model: &Model, column: u16, row: u16) -> Option<usize> {
    let grid_row = usize::from(row.checked_sub(1)?);
    if grid_row >= usize::from(model.viewport.height()) {
        return None;
    }
    let card_row = (model.viewport.offset() + grid_row) / usize::from(CARD_HEIGHT);
    let card_col = usize::from(column / model.card_width().max(1));
    if card_col >= model.columns() {
        return None;
    }
    let index = card_row * model.columns() + card_col;
    (index < model.cards().len()).then_some(index)
}
