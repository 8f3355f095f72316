use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::{App, InputMode, Pane};
use crate::config;
use crate::library::probe_duration;
use crate::player::{Player, PlayerCmd};
use crate::playlist::Track;
use crate::runtime::UiMsg;
use crate::ui;
use crate::youtube::{Downloader, is_url, search};

/// Main terminal event loop: drains background messages, draws, and handles
/// input until the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    ui_tx: &Sender<UiMsg>,
    ui_rx: &Receiver<UiMsg>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            handle_ui_msg(app, msg);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key_event(key, settings, app, player, ui_tx);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_ui_msg(app: &mut App, msg: UiMsg) {
    match msg {
        UiMsg::Progress(p) => app.progress = p,
        UiMsg::SearchDone(hits) => {
            app.set_status(format!("{} result(s)", hits.len()));
            app.set_search_results(hits);
        }
        UiMsg::SearchFailed(e) => {
            app.searching = false;
            app.set_status(e);
        }
        UiMsg::DownloadProgress { downloaded, total } => {
            app.download_label = Some(match total {
                Some(total) if total > 0 => format!(
                    "downloading {:.1} / {:.1} MiB",
                    downloaded as f64 / (1024.0 * 1024.0),
                    total as f64 / (1024.0 * 1024.0),
                ),
                _ => format!("downloading {:.1} MiB", downloaded as f64 / (1024.0 * 1024.0)),
            });
        }
        UiMsg::DownloadDone { path, title } => {
            app.downloading = false;
            app.download_label = None;
            app.register_download(&path, &title);
            let duration = probe_duration(&path);
            let track = App::track_for_download(path.display().to_string(), title.clone(), duration);
            let (_, added) = app.playlist.lock().unwrap().push(track);
            if added {
                app.set_status(format!("downloaded and queued: {title}"));
            } else {
                app.set_status(format!("downloaded: {title} (already queued)"));
            }
        }
        UiMsg::DownloadFailed(e) => {
            app.downloading = false;
            app.download_label = None;
            app.set_status(e);
        }
        UiMsg::Error(e) => app.set_status(e),
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    ui_tx: &Sender<UiMsg>,
) {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(key, settings, app, player, ui_tx),
        _ => handle_input_key(key, settings, app, player, ui_tx),
    }
}

fn handle_normal_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    ui_tx: &Sender<UiMsg>,
) {
    let seek = settings.playback.seek_seconds as i64;
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Tab => app.focus_next_pane(),
        KeyCode::BackTab => app.focus_prev_pane(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('/') => app.begin_input(InputMode::Search),
        KeyCode::Char('K') => app.begin_input(InputMode::LibraryKey),
        KeyCode::Char('r') => {
            if app.pane == Pane::Library && !app.library_view.is_empty() {
                app.begin_input(InputMode::Rating);
            } else {
                app.set_status("select a library entry to rate");
            }
        }
        KeyCode::Enter => activate_selection(app, player),
        KeyCode::Char('d') => start_download(settings, app, ui_tx),
        KeyCode::Char(' ') => player.send(PlayerCmd::TogglePause),
        KeyCode::Char('L') | KeyCode::Right => player.send(PlayerCmd::SeekBy(seek)),
        KeyCode::Char('H') | KeyCode::Left => player.send(PlayerCmd::SeekBy(-seek)),
        KeyCode::Char('s') => player.send(PlayerCmd::Stop),
        KeyCode::Char('c') => {
            player.send(PlayerCmd::ClearPlaylist);
            app.playlist_selected = 0;
            app.set_status("playlist cleared");
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = app.adjust_volume(0.05);
            player.send(PlayerCmd::SetVolume(v));
        }
        KeyCode::Char('-') => {
            let v = app.adjust_volume(-0.05);
            player.send(PlayerCmd::SetVolume(v));
        }
        _ => {}
    }
}

fn handle_input_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    ui_tx: &Sender<UiMsg>,
) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) if !c.is_control() => app.input.push(c),
        KeyCode::Enter => {
            let mode = app.input_mode;
            let input = app.take_input();
            if input.trim().is_empty() {
                return;
            }
            match mode {
                InputMode::Search => submit_search(input, settings, app, player, ui_tx),
                InputMode::LibraryKey => app.lookup_key(input.trim()),
                InputMode::Rating => {
                    if let Err(e) = app.rate_selected(&input) {
                        app.set_status(e.to_string());
                    }
                }
                InputMode::Normal => {}
            }
        }
        _ => {}
    }
}

/// A URL in the search box queues it for streaming right away; anything else
/// goes to the search service on a worker thread.
fn submit_search(
    input: String,
    settings: &config::Settings,
    app: &mut App,
    player: &Player,
    ui_tx: &Sender<UiMsg>,
) {
    let input = input.trim().to_string();
    if is_url(&input) {
        let track = Track {
            location: input.clone(),
            title: input,
            duration: None,
            source: crate::playlist::TrackSource::Stream,
            library_key: None,
        };
        queue_and_play(app, player, track);
        return;
    }

    if app.searching {
        app.set_status("search already running");
        return;
    }
    app.searching = true;
    app.set_status(format!("searching: {input}"));
    let max_results = settings.search.max_results;
    let tx = ui_tx.clone();
    thread::spawn(move || {
        let msg = match search(&input, max_results) {
            Ok(hits) => UiMsg::SearchDone(hits),
            Err(e) => UiMsg::SearchFailed(e.to_string()),
        };
        let _ = tx.send(msg);
    });
}

/// Enter on a list row: play from the playlist, or queue-and-play from any
/// other pane.
fn activate_selection(app: &mut App, player: &Player) {
    match app.pane {
        Pane::Playlist => {
            let index = app.playlist_selected;
            let track = app.playlist.lock().unwrap().get(index).cloned();
            if let Some(track) = track {
                player.send(PlayerCmd::Play(Some(index)));
                app.note_play(&track);
            }
        }
        Pane::Results => {
            if let Some(hit) = app.search_results.get(app.results_selected) {
                let track = App::track_for_hit(hit);
                queue_and_play(app, player, track);
            }
        }
        Pane::Files => {
            if let Some(file) = app.files.get(app.files_selected) {
                let track = App::track_for_file(file);
                queue_and_play(app, player, track);
            }
        }
        Pane::Library => {
            if let Some((key, entry)) = app.library_view.get(app.library_selected) {
                let track = App::track_for_library(key, entry);
                queue_and_play(app, player, track);
            }
        }
    }
}

/// Add `track` to the playlist (or find its existing slot) and start it.
fn queue_and_play(app: &mut App, player: &Player, track: Track) {
    let (index, added) = app.playlist.lock().unwrap().push(track.clone());
    if added {
        info!(index, title = %track.title, "queued");
    }
    player.send(PlayerCmd::Play(Some(index)));
    app.note_play(&track);
    app.set_status(format!("playing: {}", track.title));
}

/// `d` downloads the selected search result into the downloads directory.
fn start_download(settings: &config::Settings, app: &mut App, ui_tx: &Sender<UiMsg>) {
    if app.pane != Pane::Results {
        app.set_status("select a search result to download");
        return;
    }
    let Some(hit) = app.search_results.get(app.results_selected) else {
        app.set_status("no search result selected");
        return;
    };
    if app.downloading {
        app.set_status("download already running");
        return;
    }

    let title = hit.title.clone();
    let url = hit.url.clone();
    app.downloading = true;
    app.set_status(format!("downloading: {title}"));
    let dir = settings.download.dir.clone();
    let codec = settings.download.codec.clone();
    let quality = settings.download.quality.clone();
    let tx = ui_tx.clone();
    thread::spawn(move || {
        let downloader = Downloader::new(dir, codec, quality);
        let progress_tx = tx.clone();
        let result = downloader.download(&url, |downloaded, total| {
            let _ = progress_tx.send(UiMsg::DownloadProgress { downloaded, total });
        });
        let msg = match result {
            Ok((path, title)) => UiMsg::DownloadDone { path, title },
            Err(e) => UiMsg::DownloadFailed(e.to_string()),
        };
        let _ = tx.send(msg);
    });
}
