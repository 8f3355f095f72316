//! Runtime wiring: startup, the terminal event loop and shutdown.
//!
//! `run` assembles the pieces (settings, scan, metadata store, player
//! thread, poller) and owns the terminal for the lifetime of the program.
//! Background work reports in over the `UiMsg` channel.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::library::{MetadataStore, scan};
use crate::player::Player;
use crate::poller::{ProgressSnapshot, spawn_poller};
use crate::youtube::SearchHit;

mod event_loop;
mod settings;
mod startup;

/// Messages sent to the event loop by background threads.
#[derive(Debug)]
pub enum UiMsg {
    /// Periodic transport update from the poller.
    Progress(ProgressSnapshot),
    SearchDone(Vec<SearchHit>),
    SearchFailed(String),
    DownloadProgress { downloaded: u64, total: Option<u64> },
    DownloadDone { path: PathBuf, title: String },
    DownloadFailed(String),
    /// A player command failed; shown in the status line.
    Error(String),
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    startup::init_tracing(&settings);

    let files = scan(&settings.library.music_dir, &settings.library);
    let store = MetadataStore::open(&settings.library.store_path)?;

    let (ui_tx, ui_rx) = mpsc::channel::<UiMsg>();
    let player = Player::spawn(&settings, ui_tx.clone());
    let poller = spawn_poller(
        player.info(),
        player.sender(),
        ui_tx.clone(),
        Duration::from_millis(settings.playback.poll_interval_ms),
    );

    let mut app = App::new(files, store, player.playlist(), settings.playback.volume);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &player, &ui_tx, &ui_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Stops both engines and removes any temp stream file.
    player.shutdown();
    drop(ui_rx);
    let _ = poller.join();

    run_result
}
