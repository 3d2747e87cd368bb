use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::notify::ToastLevel;
use crate::search::SearchPhase;

use super::render::truncate;

const SEARCH_PROMPT: &str = " Search: ";
const TOAST_WIDTH: u16 = 48;

pub fn render_search_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let style = if model.input_focused {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };
    let hint = if model.input_focused {
        "  Enter: search  Esc: cancel"
    } else {
        "  /: edit"
    };
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(SEARCH_PROMPT, style.add_modifier(Modifier::BOLD)),
        Span::raw(model.input.clone()),
        Span::styled(hint, style.fg(Color::Indexed(250))),
    ]))
    .style(style);
    frame.render_widget(bar, area);

    if model.input_focused {
        #[allow(clippy::cast_possible_truncation)]
        let offset = (SEARCH_PROMPT.width() + model.input.width()) as u16;
        let x = (area.x + offset).min(area.right().saturating_sub(1));
        frame.set_cursor_position((x, area.y));
    }
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let state = model.search.state();
    let activity = match state.phase() {
        SearchPhase::Idle => "ready".to_string(),
        SearchPhase::FirstPageLoading => "loading...".to_string(),
        SearchPhase::NextPageLoading => format!("loading page {}...", state.page_cursor()),
        SearchPhase::PageLoaded => "scroll for more".to_string(),
        SearchPhase::Exhausted => "end of results".to_string(),
        SearchPhase::EmptyResult => "no matches".to_string(),
    };
    let query = if state.query().is_empty() {
        String::new()
    } else {
        format!("\"{}\"  ", state.query())
    };
    let position = model
        .selected
        .map_or_else(String::new, |idx| format!("  #{}", idx + 1));

    let status = format!(
        " pixgrid  {}{}/{} shown{}  [{}%]  {}  ?:help",
        query,
        state.shown(),
        state.total_matches(),
        position,
        model.viewport.scroll_percent(),
        activity
    );
    let bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(bar, area);
}

/// Stack active toasts in the top-right corner of `area`, newest on top.
pub fn render_toasts(model: &Model, frame: &mut Frame, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y;
    for toast in model.toasts().iter().rev() {
        let text_width = usize::from(width.saturating_sub(2));
        let rows = if toast.message.width() > text_width { 4 } else { 3 };
        if y + rows > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width), y, width, rows);
        let color = match toast.level {
            ToastLevel::Info => Color::Blue,
            ToastLevel::Success => Color::Green,
            ToastLevel::Warning => Color::Yellow,
            ToastLevel::Error => Color::Red,
        };
        let title = toast.level.title();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                format!(" {title} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(Color::Black).fg(Color::White));
        let body = if rows == 4 {
            toast.message.clone()
        } else {
            truncate(&toast.message, text_width)
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(body).block(block).wrap(Wrap { trim: true }),
            rect,
        );
        y += rows;
    }
}
