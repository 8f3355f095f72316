use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{LocalFile, make_display};

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Walk `dir` and collect every recognized audio file, sorted by display
/// name. Tags that fail to parse fall back to the file stem.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<LocalFile> {
    let mut files: Vec<LocalFile> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if !settings.recursive {
        walker = walker.max_depth(1);
    }

    for entry in walker.into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !(path.is_file() && is_audio_file(path, settings)) {
            continue;
        }

        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist: Option<String> = None;
        let mut duration: Option<Duration> = None;

        if let Ok(tagged) = lofty::read_from_path(path) {
            duration = Some(tagged.properties().duration());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        title = v.to_string();
                    }
                }
                if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = Some(v.to_string());
                    }
                }
            }
        }

        let display = make_display(&title, artist.as_deref());

        files.push(LocalFile {
            path: path.to_path_buf(),
            duration,
            display,
        });
    }

    files.sort_by(|a, b| a.display.to_lowercase().cmp(&b.display.to_lowercase()));
    files
}

/// Read a file's duration from its tags, if they parse.
pub fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_filters_non_audio_and_sorts_case_insensitive() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let files = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].display, "A");
        assert_eq!(files[1].display, "b");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let files = scan(dir.path(), &settings);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].display, "root");
    }
}
