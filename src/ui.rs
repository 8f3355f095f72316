//! UI rendering for the terminal interface.
//!
//! Four list panes (search results, playlist, local files, library) around a
//! header, an input line and a transport footer with the progress gauge.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};
use std::time::Duration;

use crate::app::{App, InputMode, Pane};
use crate::config::UiSettings;
use crate::poller::format_mmss;

const CONTROLS: &str = "[/] search  [Tab] pane  [j/k] move  [enter] play  [d] download  [space] pause  [H/L] seek  [s] stop  [c] clear  [K] key lookup  [r] rate  [+/-] volume  [q] quit";

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], ui_settings);
    draw_input(frame, chunks[1], app);
    draw_panes(frame, chunks[2], app);
    draw_transport(frame, chunks[3], app);
}

fn draw_header(frame: &mut Frame, area: Rect, ui_settings: &UiSettings) {
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" jukebox ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, area);
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let (title, text, style) = match app.input_mode {
        InputMode::Normal => (
            " input ",
            String::from("press / to search or paste a URL"),
            Style::default().fg(Color::DarkGray),
        ),
        InputMode::Search => (" search ", format!("{}_", app.input), Style::default()),
        InputMode::LibraryKey => (" library key ", format!("{}_", app.input), Style::default()),
        InputMode::Rating => (" rating 1-5 ", format!("{}_", app.input), Style::default()),
    };
    let input = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);
}

fn draw_panes(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    let results: Vec<ListItem> = app
        .search_results
        .iter()
        .map(|h| ListItem::new(h.display()))
        .collect();
    draw_list(
        frame,
        left[0],
        app,
        Pane::Results,
        " results ",
        results,
        app.results_selected,
    );

    let playing = app.progress.index;
    let playlist_items: Vec<ListItem> = app
        .playlist
        .lock()
        .unwrap()
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let marker = if playing == Some(i) { "> " } else { "  " };
            ListItem::new(format!(
                "{marker}{} [{}]",
                t.title,
                duration_text(t.duration)
            ))
        })
        .collect();
    draw_list(
        frame,
        left[1],
        app,
        Pane::Playlist,
        " playlist ",
        playlist_items,
        app.playlist_selected,
    );

    let files: Vec<ListItem> = app
        .files
        .iter()
        .map(|f| ListItem::new(format!("{} [{}]", f.display, duration_text(f.duration))))
        .collect();
    draw_list(
        frame,
        right[0],
        app,
        Pane::Files,
        " files ",
        files,
        app.files_selected,
    );

    let library: Vec<ListItem> = app
        .library_view
        .iter()
        .map(|(key, e)| {
            let rating = e.rating.map_or_else(|| "-".to_string(), |r| format!("{r}/5"));
            ListItem::new(format!(
                "{key}: {} [{rating}] ({} plays)",
                e.name, e.play_count
            ))
        })
        .collect();
    draw_list(
        frame,
        right[1],
        app,
        Pane::Library,
        " library ",
        library,
        app.library_selected,
    );
}

fn draw_list(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    pane: Pane,
    title: &str,
    items: Vec<ListItem>,
    selected: usize,
) {
    let focused = app.pane == pane;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if focused {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_transport(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inset(area));
    frame.render_widget(
        Block::default().borders(Borders::ALL).title(" transport "),
        area,
    );

    frame.render_widget(Paragraph::new(now_playing_line(app)), rows[0]);

    let gauge = Gauge::default()
        .ratio(app.progress.fraction.clamp(0.0, 1.0))
        .label(app.progress.time_label.clone())
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black));
    frame.render_widget(gauge, rows[1]);

    frame.render_widget(
        Paragraph::new(CONTROLS).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );
}

/// One line of transport status: what is playing, how, and the volume.
fn now_playing_line(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    match app.progress.index {
        Some(index) => {
            let title = app
                .playlist
                .lock()
                .unwrap()
                .get(index)
                .map(|t| t.title.clone())
                .unwrap_or_default();
            let label = if app.progress.streaming {
                "Now streaming"
            } else {
                "Now playing"
            };
            let state = if app.progress.paused { " (paused)" } else { "" };
            parts.push(format!("{label}: {title}{state}"));
        }
        None => parts.push("Stopped".to_string()),
    }

    if app.searching {
        parts.push("searching...".to_string());
    }
    if let Some(dl) = &app.download_label {
        parts.push(dl.clone());
    }
    parts.push(format!("vol {:.0}%", app.volume * 100.0));
    if !app.status.is_empty() {
        parts.push(app.status.clone());
    }

    parts.join("  |  ")
}

fn duration_text(d: Option<Duration>) -> String {
    d.map_or_else(|| "-:--".to_string(), format_mmss)
}

fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    }
}
