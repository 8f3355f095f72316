//! Application model types: `App`, `Pane` and `InputMode`.

use std::path::Path;
use std::time::Duration;

use crate::error::JukeboxError;
use crate::library::{LibraryEntry, LocalFile, MetadataStore, parse_rating};
use crate::playlist::{PlaylistHandle, Track, TrackSource};
use crate::poller::ProgressSnapshot;
use crate::youtube::SearchHit;

/// Which list currently has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pane {
    Results,
    Playlist,
    Files,
    Library,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Results => Pane::Playlist,
            Pane::Playlist => Pane::Files,
            Pane::Files => Pane::Library,
            Pane::Library => Pane::Results,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Pane::Results => Pane::Library,
            Pane::Playlist => Pane::Results,
            Pane::Files => Pane::Playlist,
            Pane::Library => Pane::Files,
        }
    }
}

/// What keystrokes currently mean. Text entry modes capture characters into
/// the input buffer until Enter or Esc.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a search query or URL.
    Search,
    /// Typing a library key to look up.
    LibraryKey,
    /// Typing a 1..=5 rating for the selected library entry.
    Rating,
}

/// The main application model.
pub struct App {
    pub playlist: PlaylistHandle,
    pub store: MetadataStore,

    pub files: Vec<LocalFile>,
    pub search_results: Vec<SearchHit>,
    /// Key-ordered copy of the store for rendering; rebuilt after mutations.
    pub library_view: Vec<(String, LibraryEntry)>,

    pub pane: Pane,
    pub input_mode: InputMode,
    pub input: String,

    pub results_selected: usize,
    pub playlist_selected: usize,
    pub files_selected: usize,
    pub library_selected: usize,

    pub progress: ProgressSnapshot,
    pub status: String,
    pub volume: f32,

    pub searching: bool,
    pub downloading: bool,
    pub download_label: Option<String>,

    pub should_quit: bool,
}

impl App {
    pub fn new(
        files: Vec<LocalFile>,
        store: MetadataStore,
        playlist: PlaylistHandle,
        volume: f32,
    ) -> Self {
        let mut app = Self {
            playlist,
            store,
            files,
            search_results: Vec::new(),
            library_view: Vec::new(),
            pane: Pane::Results,
            input_mode: InputMode::Normal,
            input: String::new(),
            results_selected: 0,
            playlist_selected: 0,
            files_selected: 0,
            library_selected: 0,
            progress: ProgressSnapshot::default(),
            status: String::from("press / to search, Tab to switch panes"),
            volume,
            searching: false,
            downloading: false,
            download_label: None,
            should_quit: false,
        };
        app.rebuild_library_view();
        app
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    /// Number of rows in the focused pane.
    pub fn pane_len(&self) -> usize {
        match self.pane {
            Pane::Results => self.search_results.len(),
            Pane::Playlist => self.playlist.lock().unwrap().len(),
            Pane::Files => self.files.len(),
            Pane::Library => self.library_view.len(),
        }
    }

    fn selected_mut(&mut self) -> &mut usize {
        match self.pane {
            Pane::Results => &mut self.results_selected,
            Pane::Playlist => &mut self.playlist_selected,
            Pane::Files => &mut self.files_selected,
            Pane::Library => &mut self.library_selected,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.pane_len();
        let sel = self.selected_mut();
        if len > 0 && *sel + 1 < len {
            *sel += 1;
        }
    }

    pub fn select_prev(&mut self) {
        let sel = self.selected_mut();
        *sel = sel.saturating_sub(1);
    }

    pub fn focus_next_pane(&mut self) {
        self.pane = self.pane.next();
        self.clamp_selection();
    }

    pub fn focus_prev_pane(&mut self) {
        self.pane = self.pane.prev();
        self.clamp_selection();
    }

    /// Keep the selection inside the list after it shrank (clear, re-scan).
    pub fn clamp_selection(&mut self) {
        let len = self.pane_len();
        let sel = self.selected_mut();
        if *sel >= len {
            *sel = len.saturating_sub(1);
        }
    }

    pub fn begin_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Leave text entry and hand the buffer to the caller.
    pub fn take_input(&mut self) -> String {
        self.input_mode = InputMode::Normal;
        std::mem::take(&mut self.input)
    }

    pub fn set_search_results(&mut self, hits: Vec<SearchHit>) {
        self.search_results = hits;
        self.results_selected = 0;
        self.searching = false;
    }

    pub fn rebuild_library_view(&mut self) {
        self.library_view = self
            .store
            .iter()
            .map(|(k, e)| (k.clone(), e.clone()))
            .collect();
        if self.library_selected >= self.library_view.len() {
            self.library_selected = self.library_view.len().saturating_sub(1);
        }
    }

    /// Key of the library row under the cursor.
    pub fn selected_library_key(&self) -> Option<&str> {
        self.library_view
            .get(self.library_selected)
            .map(|(k, _)| k.as_str())
    }

    /// Apply a rating typed by the user to the selected library entry.
    pub fn rate_selected(&mut self, input: &str) -> Result<(), JukeboxError> {
        let rating = parse_rating(input)?;
        let key = self
            .selected_library_key()
            .map(str::to_string)
            .ok_or_else(|| JukeboxError::MetadataNotFound("no selection".into()))?;
        self.store.update_rating(&key, rating)?;
        self.rebuild_library_view();
        self.set_status(format!("rated {key}: {rating}/5"));
        Ok(())
    }

    /// Look a track up by key and report what is known about it.
    pub fn lookup_key(&mut self, key: &str) {
        match self.store.get(key) {
            Some(entry) => {
                let rating = entry
                    .rating
                    .map_or_else(|| String::from("unrated"), |r| format!("{r}/5"));
                let msg = format!(
                    "{}: {} ({rating}, played {} times)",
                    key, entry.name, entry.play_count
                );
                self.set_status(msg);
            }
            None => self.set_status(format!("track {key} not found in library")),
        }
    }

    /// Record that a playlist track started playing. Only library-keyed
    /// tracks carry a play count, and only when their file is present; a
    /// missing file fails to load in the player and must not count.
    pub fn note_play(&mut self, track: &Track) {
        if let Some(key) = &track.library_key {
            if !Path::new(&track.location).exists() {
                return;
            }
            match self.store.increment_play_count(key) {
                Ok(count) => {
                    tracing::debug!(key, count, "play count updated");
                    self.rebuild_library_view();
                }
                Err(e) => self.set_status(e.to_string()),
            }
        }
    }

    /// Add a finished download to the metadata store, keyed by its file
    /// stem. An existing entry (re-download) is left as-is so its rating and
    /// play count survive.
    pub fn register_download(&mut self, path: &Path, title: &str) {
        let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };
        if self.store.get(key).is_some() {
            return;
        }
        let entry = LibraryEntry {
            name: title.to_string(),
            artist: String::new(),
            rating: None,
            play_count: 0,
            file_path: path.display().to_string(),
        };
        let key = key.to_string();
        if let Err(e) = self.store.insert(&key, entry) {
            self.set_status(e.to_string());
            return;
        }
        self.rebuild_library_view();
    }

    pub fn adjust_volume(&mut self, delta: f32) -> f32 {
        self.volume = (self.volume + delta).clamp(0.0, 1.0);
        self.volume
    }

    pub fn track_for_file(file: &LocalFile) -> Track {
        Track {
            location: file.path.display().to_string(),
            title: file.display.clone(),
            duration: file.duration,
            source: TrackSource::Local,
            library_key: None,
        }
    }

    pub fn track_for_hit(hit: &SearchHit) -> Track {
        Track {
            location: hit.url.clone(),
            title: hit.title.clone(),
            duration: hit.duration,
            source: TrackSource::Stream,
            library_key: None,
        }
    }

    pub fn track_for_library(key: &str, entry: &LibraryEntry) -> Track {
        Track {
            location: entry.file_path.clone(),
            title: entry.name.clone(),
            duration: None,
            source: TrackSource::Library,
            library_key: Some(key.to_string()),
        }
    }

    pub fn track_for_download(path: String, title: String, duration: Option<Duration>) -> Track {
        Track {
            location: path,
            title,
            duration,
            source: TrackSource::Downloaded,
            library_key: None,
        }
    }
}
