//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::catalog::{Catalog, format_clock};
use crate::config::{ControlsSettings, UiSettings};
use crate::playback::PlayerState;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("up/down", "volume"),
    ("m", "mode"),
    ("c", "details"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    parts.insert(4, format!("[H/L] scrub -/+{scrub_seconds}s"));
    parts.join(" | ")
}

/// `active` also covers a switch waiting to resume, matching what MPRIS reports.
fn status_text(catalog: &Catalog, state: &PlayerState, active: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.push(format!(" MODE: {}", state.mode));
    parts.push(format!("VOLUME: {:.0}%", state.volume * 100.0));
    parts.push(if active { "Playing" } else { "Paused" }.to_string());

    if let Some(track) = catalog.get(state.index) {
        let name = if track.artist.is_empty() {
            track.title.clone()
        } else {
            format!("{} - {}", track.artist, track.title)
        };
        parts.push(format!(
            "Song: {} [{} / {}]",
            name,
            format_clock(state.time),
            track.length
        ));
    }

    parts.join(" • ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
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

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into `frame`.
#[allow(clippy::too_many_arguments)]
pub fn draw(
    frame: &mut Frame,
    app: &App,
    catalog: &Catalog,
    state: &PlayerState,
    active: bool,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
    now: Instant,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header; a fresh message (e.g. the new mode) replaces the tagline.
    let header_text = app.message(now).unwrap_or(ui_settings.header_text.as_str());
    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" segue ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(catalog, state, active))
        .block(Block::bordered().padding(left_pad()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Progress through the active track.
    let total = catalog
        .get(state.index)
        .map(|t| t.duration().as_secs_f64())
        .unwrap_or(0.0);
    let ratio = if total > 0.0 {
        (state.time.as_secs_f64() / total).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .ratio(ratio)
        .label(format_clock(state.time));
    frame.render_widget(progress, chunks[2]);

    // Track list, windowed around the cursor.
    {
        let tracks = catalog.tracks();
        let total = tracks.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = sel.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let i = start + offset;
                let marker = if i == state.index { "♪ " } else { "  " };
                ListItem::new(format!("{marker}{} - {} ({})", track.artist, track.title, track.length))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ratatui::widgets::ListState::default();
        if total > 0 {
            list_state.select(Some(sel - start));
        }
        frame.render_stateful_widget(list, chunks[3], &mut list_state);
    }

    if app.details {
        let popup_area = centered_rect_sized(72, 9, chunks[3]);
        frame.render_widget(Clear, popup_area);

        let details = match catalog.get(app.selected) {
            Some(track) => format!(
                "Title: {}\nArtist: {}\nLength: {}\nCover: {}\nAudio: {}",
                track.title,
                if track.artist.is_empty() { "-" } else { track.artist.as_str() },
                track.length,
                if track.cover.is_empty() { "-" } else { track.cover.as_str() },
                track.audio.display()
            ),
            None => "No track selected".to_string(),
        };
        let popup = Paragraph::new(details)
            .block(
                Block::default()
                    .padding(left_pad())
                    .borders(Borders::ALL)
                    .title(" details (c closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
