//! The playback queue shared between the UI and the player thread.
//!
//! A `Playlist` is an ordered list of `Track`s identified by their
//! path/URL. It is append-only from the user's perspective, apart from an
//! explicit clear, and it rejects duplicate entries by identity. It is not
//! persisted across runs.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Where a track came from; selects the playback engine and how the UI
/// labels it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackSource {
    /// A file picked from the local files pane.
    Local,
    /// A file resolved through the metadata store.
    Library,
    /// A file produced by the downloader.
    Downloaded,
    /// A remote video played through the stream engine.
    Stream,
}

impl TrackSource {
    /// Streams go through the remote engine; everything else is a local file.
    pub fn is_stream(self) -> bool {
        matches!(self, TrackSource::Stream)
    }
}

#[derive(Debug, Clone)]
pub struct Track {
    /// Filesystem path for local sources, video URL for streams. This is the
    /// track's identity within the playlist.
    pub location: String,
    pub title: String,
    /// Unknown until the source has been probed; streams get corrected after
    /// the remote load reports the real duration.
    pub duration: Option<Duration>,
    pub source: TrackSource,
    /// Metadata store key when the track was played from the library pane.
    pub library_key: Option<String>,
}

#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

pub type PlaylistHandle = Arc<Mutex<Playlist>>;

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track unless one with the same location already exists.
    ///
    /// Returns the index of the track and whether it was newly added, so
    /// callers can jump playback to an already-present entry instead of
    /// duplicating it.
    pub fn push(&mut self, track: Track) -> (usize, bool) {
        if let Some(pos) = self.tracks.iter().position(|t| t.location == track.location) {
            return (pos, false);
        }
        self.tracks.push(track);
        (self.tracks.len() - 1, true)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Correct a track's duration after its source reported the real value.
    pub fn set_duration(&mut self, index: usize, duration: Duration) {
        if let Some(t) = self.tracks.get_mut(index) {
            t.duration = Some(duration);
        }
    }

    /// Replace a track's title. Direct-URL streams are queued under their URL
    /// and renamed once the real title is known.
    pub fn set_title(&mut self, index: usize, title: String) {
        if let Some(t) = self.tracks.get_mut(index) {
            t.title = title;
        }
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(location: &str, source: TrackSource) -> Track {
        Track {
            location: location.into(),
            title: location.into(),
            duration: None,
            source,
            library_key: None,
        }
    }

    #[test]
    fn push_rejects_duplicate_locations() {
        let mut pl = Playlist::new();
        let (i0, added0) = pl.push(t("/music/a.mp3", TrackSource::Local));
        let (i1, added1) = pl.push(t("/music/a.mp3", TrackSource::Local));
        assert!(added0);
        assert!(!added1);
        assert_eq!(i0, i1);
        assert_eq!(pl.len(), 1);
    }

    #[test]
    fn push_treats_distinct_urls_as_distinct_tracks() {
        let mut pl = Playlist::new();
        pl.push(t("https://example.com/watch?v=a", TrackSource::Stream));
        let (idx, added) = pl.push(t("https://example.com/watch?v=b", TrackSource::Stream));
        assert!(added);
        assert_eq!(idx, 1);
    }

    #[test]
    fn clear_empties_the_list() {
        let mut pl = Playlist::new();
        pl.push(t("/music/a.mp3", TrackSource::Local));
        pl.push(t("/music/b.mp3", TrackSource::Downloaded));
        pl.clear();
        assert!(pl.is_empty());
        assert!(pl.get(0).is_none());
    }

    #[test]
    fn set_duration_corrects_a_track_post_load() {
        let mut pl = Playlist::new();
        let (idx, _) = pl.push(t("https://example.com/watch?v=a", TrackSource::Stream));
        pl.set_duration(idx, Duration::from_secs(213));
        assert_eq!(pl.get(idx).unwrap().duration, Some(Duration::from_secs(213)));
        // Out-of-range indices are ignored.
        pl.set_duration(99, Duration::from_secs(1));
    }

    #[test]
    fn set_title_renames_without_changing_identity() {
        let mut pl = Playlist::new();
        let url = "https://example.com/watch?v=a";
        let (idx, _) = pl.push(t(url, TrackSource::Stream));
        pl.set_title(idx, "A Real Title".to_string());
        assert_eq!(pl.get(idx).unwrap().title, "A Real Title");

        let (again, added) = pl.push(t(url, TrackSource::Stream));
        assert_eq!(again, idx);
        assert!(!added);
    }
}
