//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`, plus
//! the hit-testing used to turn mouse clicks back into intents.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};
use crate::player::{Phase, PlayerView, format_time, fraction_from_offset};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next track".to_string());
    // H/L is filled dynamically from config.
    map.insert("0-9".to_string(), "seek to 0-90%".to_string());
    map.insert("K".to_string(), "details".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "0-9", "gg/G", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Screen regions, shared by drawing and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub header: Rect,
    pub card: Rect,
    /// The single row that acts as the seekable progress surface.
    pub progress: Rect,
    pub times: Rect,
    pub message: Rect,
    pub list: Rect,
    pub footer: Rect,
}

const CARD_HEIGHT: u16 = 7;

pub fn layout(area: Rect) -> UiLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(CARD_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(area);

    let card = chunks[1];
    let inner = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .inner(card);
    let row = |offset: u16| Rect {
        x: inner.x,
        y: inner.y.saturating_add(offset),
        width: inner.width,
        height: if offset < inner.height { 1 } else { 0 },
    };

    UiLayout {
        header: chunks[0],
        card,
        progress: row(2),
        times: row(3),
        message: row(4),
        list: chunks[2],
        footer: chunks[3],
    }
}

fn contains(r: Rect, column: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && column >= r.x
        && column < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

/// Fraction of the progress surface under a click, if the click hit it.
pub fn progress_fraction_at(ui: &UiLayout, column: u16, row: u16) -> Option<f64> {
    if !contains(ui.progress, column, row) {
        return None;
    }
    let offset = f64::from(column - ui.progress.x);
    fraction_from_offset(offset, f64::from(ui.progress.width))
}

/// Compute the visible slice of a list of `total` rows in `height` rows,
/// centering the selected position when possible.
fn visible_window(total: usize, height: usize, sel_pos: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, sel_pos);
    }
    let half = height / 2;
    let mut start = sel_pos.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, sel_pos - start)
}

fn list_inner(ui: &UiLayout) -> Rect {
    Block::default().borders(Borders::ALL).inner(ui.list)
}

/// Catalog index of the list row under a click.
pub fn track_at(ui: &UiLayout, app: &App, column: u16, row: u16) -> Option<usize> {
    let inner = list_inner(ui);
    if !contains(inner, column, row) {
        return None;
    }
    let (start, end, _) = visible_window(app.track_count(), inner.height as usize, app.selected);
    let idx = start + (row - inner.y) as usize;
    (idx < end).then_some(idx)
}

/// Build the filled/empty progress bar for `width` cells.
fn progress_bar(progress: f64, width: usize) -> Line<'static> {
    let occupied = (width as f64 * progress.clamp(0.0, 1.0)) as usize;
    let fill_style = Style::default().add_modifier(Modifier::BOLD);
    let empty_style = Style::default().add_modifier(Modifier::DIM);

    let mut spans: Vec<Span> = Vec::with_capacity(3);
    if occupied > 0 {
        spans.push(Span::styled("━".repeat(occupied - 1), fill_style));
        // Playhead knob
        spans.push(Span::styled("●", fill_style));
    }
    spans.push(Span::styled(
        "─".repeat(width.saturating_sub(occupied)),
        empty_style,
    ));
    Line::from(spans)
}

/// Now-playing heading: state glyph, title and artist.
fn now_playing_line(view: &PlayerView) -> Line<'static> {
    let state = match (view.phase, view.loading) {
        (Phase::Active, true) => "… Loading",
        (Phase::Active, false) => "▶ Playing",
        (Phase::Idle, _) => "⏸ Paused",
    };

    match view.current_track() {
        Some(track) => Line::from(vec![
            Span::raw(format!("{state}  ")),
            Span::styled(track.title.clone(), Style::default().bold()),
            Span::raw(format!("  {}", track.artist)),
        ]),
        None => Line::from(state),
    }
}

/// Elapsed and total time labels. Total reads `-:--` until metadata arrives.
pub fn time_labels(view: &PlayerView) -> (String, String) {
    let elapsed = format_time(view.position_seconds);
    let total = view
        .total_seconds
        .map(format_time)
        .unwrap_or_else(|| "-:--".to_string());
    (elapsed, total)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    view: &PlayerView,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let ui = layout(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" nocturne ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, ui.header);

    // Now-playing card
    let card = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .title(" now playing ");
    let card_inner = card.inner(ui.card);
    frame.render_widget(card, ui.card);
    frame.render_widget(
        Paragraph::new(now_playing_line(view)),
        Rect {
            height: card_inner.height.min(1),
            ..card_inner
        },
    );
    frame.render_widget(
        Paragraph::new(progress_bar(view.progress, ui.progress.width as usize)),
        ui.progress,
    );

    let (elapsed, total) = time_labels(view);
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(ui.times);
    frame.render_widget(Paragraph::new(elapsed), halves[0]);
    frame.render_widget(
        Paragraph::new(total).alignment(Alignment::Right),
        halves[1],
    );

    let message = match (view.last_error, app.notice.as_deref()) {
        (Some(err), _) => Some(Line::from(format!("Error: {err}")).slow_blink()),
        (None, Some(notice)) => Some(Line::from(notice.to_string()).italic()),
        (None, None) => None,
    };
    if let Some(message) = message {
        frame.render_widget(Paragraph::new(message), ui.message);
    }

    // Track list
    {
        let total = view.catalog.len();
        let list_height = list_inner(&ui).height as usize;
        let (start, end, selected_pos_in_visible) =
            visible_window(total, list_height, app.selected);

        let visible_items: Vec<ListItem> = view.catalog.tracks()[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let i = start + offset;
                let marker = if i == view.current_index && view.is_playing {
                    "♫ "
                } else if i == view.current_index {
                    "• "
                } else {
                    "  "
                };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(track.title.clone(), Style::default().bold()),
                    Span::raw(format!(" - {}", track.artist)),
                    Span::styled(
                        format!("  [{}]", track.duration_label),
                        Style::default().dim(),
                    ),
                ]))
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, ui.list, &mut state);
    }

    // Overlay details popup (keeps list visible under it)
    if app.details_window {
        let popup_area = centered_rect_sized(72, 10, ui.list);
        frame.render_widget(Clear, popup_area);

        let details = match view.catalog.get(app.selected) {
            Some(track) => {
                let known = if app.selected == view.current_index {
                    view.total_seconds
                        .map(format_time)
                        .unwrap_or_else(|| "-".to_string())
                } else {
                    "-".to_string()
                };
                let mut text = format!(
                    "Id: {}\nTitle: {}\nArtist: {}\nLength: {} (loaded: {})\nAudio: {}",
                    track.id, track.title, track.artist, track.duration_label, known, track.audio_ref
                );
                if ui_settings.show_cover_refs && !track.cover_ref.is_empty() {
                    text.push_str(&format!("\nCover: {}", track.cover_ref));
                }
                text
            }
            None => "No track selected".to_string(),
        };
        let details_paragraph = Paragraph::new(details)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" details (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(details_paragraph, popup_area);
    }

    let footer_text = controls_text(controls_settings.scrub_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, ui.footer);
}

#[cfg(test)]
mod tests;
