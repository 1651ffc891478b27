//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the storefront using `ratatui`:
//! header, mini player, beat list, overlays and the controls footer.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, CardView, Overlay};
use crate::config::{ControlsSettings, UiSettings};
use crate::playback::{AmbientPhase, AmbientSession, PlaybackSession};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("j/k", "up/down"),
        ("gg/G", "top/bottom"),
        ("enter", "preview selected"),
        ("p", "play/pause"),
        ("+/-", "volume"),
        ("m", "ambient"),
        ("/", "search"),
        ("t", "tag"),
        ("a/x", "cart add/remove"),
        ("c", "cart"),
        ("C", "purge cart"),
        ("1-5", "rate"),
        ("b", "buy"),
        ("K", "details"),
        ("q", "quit"),
    ])
});

const PADDED: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating scrub seconds.
pub(crate) fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "gg/G", "enter", "p", "H/L", "+/-", "m", "/", "t", "a/x", "c", "C", "1-5", "b",
        "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{scrub_seconds}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a time as `m:ss`. Unknown times render as `0:00`.
pub(crate) fn format_clock(d: Option<Duration>) -> String {
    let secs = d.map_or(0, |d| d.as_secs());
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Five-star bar for a 0..=5 rating.
pub(crate) fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// One row of the beat list.
pub(crate) fn card_line(card: &CardView<'_>) -> String {
    let marker = match (card.is_active, card.is_playing) {
        (true, true) => "▶",
        (true, false) => "⏸",
        _ => " ",
    };
    let cart = if card.in_cart { "[in cart]" } else { "" };
    format!(
        "{marker} {:<24} {:>3} BPM  {:<7} {:>8}  {:<18} {}  {cart}",
        card.track.title,
        card.track.bpm,
        card.track.key,
        card.track.price_label(),
        card.track.tags.join(" · "),
        stars(card.rating),
    )
}

fn ambient_text(ambient: &AmbientSession) -> String {
    let state = match ambient.phase {
        AmbientPhase::Silent if ambient.enabled => "on, yielding",
        AmbientPhase::Silent => "off",
        AmbientPhase::FadingIn => "fading in",
        AmbientPhase::Audible => "on",
        AmbientPhase::FadingOut => "fading out",
    };
    format!("AMBIENT: {state} ({:.0}%)", ambient.volume * 100.0)
}

/// First line of the mini player.
pub(crate) fn player_text(
    app: &App,
    playback: &PlaybackSession,
    ambient: &AmbientSession,
    ui: &UiSettings,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    let now = playback
        .current
        .as_ref()
        .and_then(|id| app.catalog().find(id));
    match now {
        Some(track) => {
            let state = if playback.playing { "▶" } else { "⏸" };
            parts.push(format!(
                "{state} {} [{}{}{}]",
                track.title,
                format_clock(Some(playback.elapsed)),
                ui.time_separator,
                format_clock(playback.duration)
            ));
        }
        None => parts.push("Nothing previewing".to_string()),
    }

    parts.push(format!("VOL: {:.0}%", playback.volume * 100.0));
    parts.push(ambient_text(ambient));
    parts.push(format!("CART: {}", app.cart.len()));

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        parts.push(format!("SEARCH: {q}"));
    }
    if let Some(tag) = app.tag_filter {
        parts.push(format!("TAG: {tag}"));
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

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    playback: &PlaybackSession,
    ambient: &AmbientSession,
    display: &[usize],
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" franco ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_player(frame, chunks[1], app, playback, ambient, ui_settings);
    draw_list(frame, chunks[2], app, playback, display);

    match &app.overlay {
        Overlay::None => {}
        Overlay::Details => draw_details(frame, chunks[2], app),
        Overlay::Cart => draw_cart(frame, chunks[2], app),
        Overlay::ConfirmPurchase(id) => {
            let body = match app.catalog().find(id) {
                Some(t) => format!("Buy a license for {} at {}?", t.title, t.price_label()),
                None => "This track is no longer available.".to_string(),
            };
            draw_confirm(frame, chunks[2], " confirm purchase ", &body);
        }
        Overlay::ConfirmClearCart => draw_confirm(
            frame,
            chunks[2],
            " purge cart ",
            &format!("Remove all {} items from the cart?", app.cart.len()),
        ),
    }

    let footer_title = match &app.notice {
        Some(n) => format!(" {n} "),
        None => " controls ".to_string(),
    };
    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(footer_title)
                .padding(PADDED),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_player(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    playback: &PlaybackSession,
    ambient: &AmbientSession,
    ui: &UiSettings,
) {
    let block = Block::bordered().padding(PADDED).title(" player ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let text = Paragraph::new(player_text(app, playback, ambient, ui));
    frame.render_widget(text, rows[0]);

    let gauge = Gauge::default()
        .ratio(playback.progress())
        .label(format!("{:.0}%", playback.progress() * 100.0))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(gauge, rows[1]);
}

fn draw_list(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    playback: &PlaybackSession,
    display: &[usize],
) {
    // Only build ListItems for the window around the selection.
    let total = display.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let visible_items: Vec<ListItem> = display[start..end]
        .iter()
        .filter_map(|&i| app.card_view(i, playback))
        .map(|card| {
            let item = ListItem::new(card_line(&card));
            if card.is_active {
                item.bold()
            } else {
                item
            }
        })
        .collect();

    let title = if total == 0 {
        " beats (no match) ".to_string()
    } else {
        format!(" beats ({total}) ")
    };
    let list = List::new(visible_items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_details(frame: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect_sized(72, 11, area);
    frame.render_widget(Clear, popup_area);

    let meta = match app.selected_track() {
        Some(t) => format!(
            "Title: {}\nBPM: {}  Key: {}  Price: {}\nTags: {}\nRating: {}\n\n{}\n\nPreview: {}\nArtwork: {}",
            t.title,
            t.bpm,
            t.key,
            t.price_label(),
            t.tags.join(", "),
            stars(app.rating(&t.id)),
            t.description,
            t.preview,
            if t.artwork.is_empty() { "-" } else { t.artwork.as_str() },
        ),
        None => "No track selected".to_string(),
    };
    let paragraph = Paragraph::new(meta)
        .block(
            Block::default()
                .padding(PADDED)
                .borders(Borders::ALL)
                .title(" details (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

fn draw_cart(frame: &mut Frame, area: Rect, app: &App) {
    let tracks = app.cart_tracks();
    let height = u16::try_from(tracks.len()).unwrap_or(u16::MAX).saturating_add(5);
    let popup_area = centered_rect_sized(56, height, area);
    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<String> = tracks
        .iter()
        .map(|t| format!("{:<36} {:>10}", t.title, t.price_label()))
        .collect();
    if lines.is_empty() {
        lines.push("Cart is empty".to_string());
    }
    lines.push(String::new());
    lines.push(format!("{:<36} {:>10}", "TOTAL", format!("${:.2}", app.cart_total())));

    let paragraph = Paragraph::new(lines.join("\n")).block(
        Block::default()
            .padding(PADDED)
            .borders(Borders::ALL)
            .title(" cart (c closes, C purges) "),
    );
    frame.render_widget(paragraph, popup_area);
}

fn draw_confirm(frame: &mut Frame, area: Rect, title: &str, body: &str) {
    let popup_area = centered_rect_sized(52, 6, area);
    frame.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(format!("{body}\n\n[y/enter] confirm   [n/esc] cancel"))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}
