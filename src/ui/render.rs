use ratatui::buffer::Buffer;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::api::ImageResult;
use crate::app::{CARD_HEIGHT, Model};
use crate::search::{SearchPhase, messages};

use super::{overlays, status};

/// Render the entire UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);

    status::render_search_bar(model, frame, chunks[0]);
    render_gallery(model, frame, chunks[1]);
    status::render_status_bar(model, frame, chunks[2]);
    status::render_toasts(model, frame, chunks[1]);

    if model.lightbox().is_open() {
        overlays::render_preview_overlay(model, frame, area);
    }
    if model.help_visible {
        overlays::render_help_overlay(frame, area);
    }
}

fn render_gallery(model: &Model, frame: &mut Frame, area: Rect) {
    if model.cards().is_empty() {
        render_empty_state(model, frame, area);
        return;
    }

    let columns = model.columns();
    let card_width = model.card_width();
    let visible = model.viewport.visible_range();
    let first_row = visible.start / usize::from(CARD_HEIGHT);
    let last_row = visible.end.div_ceil(usize::from(CARD_HEIGHT));

    for grid_row in first_row..last_row {
        for column in 0..columns {
            let index = grid_row * columns + column;
            let Some(card) = model.cards().get(index) else {
                break;
            };
            #[allow(clippy::cast_possible_truncation)]
            let x = area.x + column as u16 * card_width;
            let selected = model.selected == Some(index);
            let card_buf = render_card(card, index, selected, card_width);
            blit_rows(
                &card_buf,
                frame.buffer_mut(),
                x,
                area,
                model.card_rows(index).start,
                visible.start,
            );
        }
    }
}

/// Draw one card into its own buffer so partially scrolled cards can be clipped.
fn render_card(card: &ImageResult, index: usize, selected: bool, width: u16) -> Buffer {
    let rect = Rect::new(0, 0, width, CARD_HEIGHT);
    let mut buf = Buffer::empty(rect);

    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" #{} ", index + 1));
    let inner = block.inner(rect);
    block.render(rect, &mut buf);

    let text_width = usize::from(inner.width);
    let tags = if card.tags.trim().is_empty() {
        "(untagged)"
    } else {
        card.tags.as_str()
    };
    let lines = vec![
        Line::styled(
            truncate(tags, text_width),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(vec![
            Span::styled("Likes ", Style::default().fg(Color::Indexed(245))),
            Span::raw(card.likes.to_string()),
            Span::styled("  Views ", Style::default().fg(Color::Indexed(245))),
            Span::raw(card.views.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Downloads ", Style::default().fg(Color::Indexed(245))),
            Span::raw(card.downloads.to_string()),
        ]),
        Line::styled(
            truncate(&card.thumbnail_url, text_width),
            Style::default().fg(Color::Cyan),
        ),
    ];
    Paragraph::new(lines).render(inner, &mut buf);
    buf
}

/// Copy the rows of `card` that fall inside the viewport onto the frame.
fn blit_rows(
    card: &Buffer,
    target: &mut Buffer,
    x: u16,
    area: Rect,
    card_top: usize,
    viewport_top: usize,
) {
    for dy in 0..card.area.height {
        let grid_row = card_top + usize::from(dy);
        let Some(screen_row) = grid_row.checked_sub(viewport_top) else {
            continue;
        };
        if screen_row >= usize::from(area.height) {
            break;
        }
        #[allow(clippy::cast_possible_truncation)]
        let y = area.y + screen_row as u16;
        for dx in 0..card.area.width {
            let (Some(src), Some(dst)) = (card.cell((dx, dy)), target.cell_mut((x + dx, y)))
            else {
                continue;
            };
            *dst = src.clone();
        }
    }
}

fn render_empty_state(model: &Model, frame: &mut Frame, area: Rect) {
    let (text, style) = match model.search.phase() {
        SearchPhase::Idle => (
            "Press / to search for images.".to_string(),
            Style::default().fg(Color::Indexed(245)),
        ),
        SearchPhase::EmptyResult => (
            messages::NO_MATCHES.to_string(),
            Style::default().fg(Color::Red),
        ),
        phase if phase.is_loading() => (
            format!("Searching for \"{}\"...", model.search.state().query()),
            Style::default().fg(Color::Indexed(245)),
        ),
        _ => (String::new(), Style::default()),
    };
    let top = area.y + area.height / 3;
    let line_area = Rect::new(area.x, top, area.width, area.height.saturating_sub(top - area.y));
    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        line_area,
    );
}

/// Cut `text` to at most `width` display columns, marking the cut with an ellipsis.
pub(super) fn truncate(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('\u{2026}');
    }
    out
}
