use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/jukebox/config.toml` or
/// `~/.config/jukebox/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `JUKEBOX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub search: SearchSettings,
    pub download: DownloadSettings,
    pub stream: StreamSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playback: PlaybackSettings::default(),
            search: SearchSettings::default(),
            download: DownloadSettings::default(),
            stream: StreamSettings::default(),
            library: LibrarySettings::default(),
            ui: UiSettings::default(),
            log: LogSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume, 0.0 to 1.0.
    pub volume: f32,
    /// Number of seconds the relative seek keys move by.
    pub seek_seconds: u64,
    /// Interval of the background progress poller (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            seek_seconds: 10,
            poll_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum number of results per search.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Directory that permanently keeps downloaded audio. Created on first
    /// use if absent.
    pub dir: PathBuf,
    /// Target audio codec passed to the extraction tool.
    pub codec: String,
    /// Target audio quality passed to the extraction tool.
    pub quality: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("downloads"),
            codec: "mp3".to_string(),
            quality: "192K".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Directory for transient stream downloads; files here are deleted on
    /// stop or stream switch.
    pub temp_dir: PathBuf,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("temp_streams"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory scanned for local audio files at startup.
    pub music_dir: PathBuf,
    /// Path of the JSON metadata store.
    pub store_path: PathBuf,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from("Music"),
            store_path: PathBuf::from("library.json"),
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            recursive: true,
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ jukebox ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file path. When unset, logs land under
    /// `$XDG_STATE_HOME/jukebox/jukebox.log` (or `~/.local/state/...`).
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { file: None }
    }
}
