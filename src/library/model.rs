use std::path::PathBuf;
use std::time::Duration;

/// An audio file found by scanning the music directory.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub path: PathBuf,
    pub duration: Option<Duration>,
    /// "Artist - Title" when an artist tag exists, otherwise the title.
    pub display: String,
}

pub(super) fn make_display(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), title),
        _ => title.to_string(),
    }
}
