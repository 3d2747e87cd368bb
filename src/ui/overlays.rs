use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use ratatui_image::{Resize, StatefulImage};

use crate::app::Model;

use super::render::truncate;

pub fn render_preview_overlay(model: &mut Model, frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
        area,
    );
    let total = model.lightbox().links().len();
    let Some(index) = model.lightbox().current_index() else {
        return;
    };
    let tags = model
        .cards()
        .get(index)
        .map(|card| card.tags.clone())
        .unwrap_or_default();
    let link = model.lightbox().current_link().unwrap_or_default().to_string();
    let loading = model.preview_loading();
    let can_draw = model.images_enabled && model.picker.is_some();

    let title = truncate(
        &format!(" {}/{}  {} ", index + 1, total, tags),
        usize::from(popup.width.saturating_sub(4)),
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Reserve 1 row at bottom for footer hint
    let image_area = Rect::new(
        inner.x,
        inner.y,
        inner.width,
        inner.height.saturating_sub(1),
    );
    let footer_area = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.width, 1);

    if let Some(protocol) = model.preview_protocol_mut() {
        let image = StatefulImage::default().resize(Resize::Scale(None));
        frame.render_stateful_widget(image, image_area, protocol);
    } else {
        let dim = Style::default().fg(Color::Indexed(245));
        let message = if loading {
            "Loading image...".to_string()
        } else if can_draw {
            "Image unavailable.".to_string()
        } else {
            "Image display is off.".to_string()
        };
        let lines = vec![
            Line::raw(""),
            Line::styled(message, dim),
            Line::raw(""),
            Line::styled(link, Style::default().fg(Color::Cyan)),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            image_area,
        );
    }

    let footer = Line::styled(
        "\u{2190}/\u{2192} prev/next \u{2502} o open \u{2502} y copy link \u{2502} Esc close",
        Style::default().fg(Color::Indexed(245)),
    );
    frame.render_widget(Paragraph::new(footer), footer_area);
}

type HelpSection = (&'static str, &'static [(&'static str, &'static str)]);

const HELP_LEFT: &[HelpSection] = &[
    (
        "Search",
        &[
            ("/ or s", "Edit query"),
            ("Enter", "Search"),
            ("Esc", "Leave search field"),
            ("Ctrl-u", "Clear query"),
        ],
    ),
    (
        "Gallery",
        &[
            ("arrows/hjkl", "Move selection"),
            ("Space/PgDn", "Page down"),
            ("b/PgUp", "Page up"),
            ("g / G", "First / last card"),
            ("wheel/click", "Scroll / select"),
        ],
    ),
];

const HELP_RIGHT: &[HelpSection] = &[
    (
        "Preview",
        &[
            ("Enter / p", "Open preview"),
            ("Left/Right", "Previous / next"),
            ("o", "Open in browser"),
            ("y", "Copy image link"),
            ("Esc", "Close preview"),
        ],
    ),
    ("Other", &[("? / F1", "Toggle help"), ("q / Ctrl-c", "Quit")]),
];

fn help_lines(sections: &[HelpSection]) -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    for (i, &(title, keys)) in sections.iter().enumerate() {
        if i > 0 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::styled(title, section_style));
        for (key, action) in keys {
            lines.push(Line::raw(format!(" {key:<12}{action}")));
        }
    }
    lines
}

pub fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    frame.render_widget(Paragraph::new(help_lines(HELP_LEFT)), columns[0]);
    frame.render_widget(Paragraph::new(help_lines(HELP_RIGHT)), columns[1]);
    frame.render_widget(
        Paragraph::new(Line::styled(
            "More results load as the last card scrolls into view.",
            Style::default().fg(Color::Indexed(245)),
        )),
        rows[1],
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
