use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::tempdir;

use crate::library::{LibraryEntry, LocalFile, MetadataStore};
use crate::playlist::{Playlist, TrackSource};
use crate::youtube::SearchHit;

use super::*;

fn file(name: &str) -> LocalFile {
    LocalFile {
        path: PathBuf::from(format!("/music/{name}")),
        duration: Some(Duration::from_secs(120)),
        display: name.to_string(),
    }
}

fn app_with(files: Vec<LocalFile>, store: MetadataStore) -> App {
    App::new(files, store, Arc::new(Mutex::new(Playlist::new())), 0.5)
}

fn empty_store(dir: &tempfile::TempDir) -> MetadataStore {
    MetadataStore::open(dir.path().join("library.json")).unwrap()
}

fn entry(name: &str) -> LibraryEntry {
    LibraryEntry {
        name: name.to_string(),
        artist: String::new(),
        rating: None,
        play_count: 0,
        file_path: format!("/music/{name}.mp3"),
    }
}

#[test]
fn panes_cycle_in_both_directions() {
    let dir = tempdir().unwrap();
    let mut app = app_with(vec![], empty_store(&dir));
    assert_eq!(app.pane, Pane::Results);
    app.focus_next_pane();
    assert_eq!(app.pane, Pane::Playlist);
    app.focus_next_pane();
    app.focus_next_pane();
    app.focus_next_pane();
    assert_eq!(app.pane, Pane::Results);
    app.focus_prev_pane();
    assert_eq!(app.pane, Pane::Library);
}

#[test]
fn selection_stays_inside_the_list() {
    let dir = tempdir().unwrap();
    let mut app = app_with(vec![file("a.mp3"), file("b.mp3")], empty_store(&dir));
    app.pane = Pane::Files;
    app.select_prev();
    assert_eq!(app.files_selected, 0);
    app.select_next();
    assert_eq!(app.files_selected, 1);
    app.select_next();
    assert_eq!(app.files_selected, 1);
}

#[test]
fn selection_in_an_empty_pane_is_inert() {
    let dir = tempdir().unwrap();
    let mut app = app_with(vec![], empty_store(&dir));
    app.pane = Pane::Files;
    app.select_next();
    app.select_prev();
    assert_eq!(app.files_selected, 0);
}

#[test]
fn search_results_reset_the_cursor() {
    let dir = tempdir().unwrap();
    let mut app = app_with(vec![], empty_store(&dir));
    app.results_selected = 3;
    app.searching = true;
    app.set_search_results(vec![SearchHit {
        id: "abc".into(),
        title: "hit".into(),
        url: "https://www.youtube.com/watch?v=abc".into(),
        duration: None,
    }]);
    assert_eq!(app.results_selected, 0);
    assert!(!app.searching);
}

#[test]
fn take_input_returns_and_clears_the_buffer() {
    let dir = tempdir().unwrap();
    let mut app = app_with(vec![], empty_store(&dir));
    app.begin_input(InputMode::Search);
    app.input.push_str("lofi beats");
    assert_eq!(app.take_input(), "lofi beats");
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.input.is_empty());
}

#[test]
fn rate_selected_writes_through_to_the_store() {
    let dir = tempdir().unwrap();
    let mut store = empty_store(&dir);
    store.insert("song1", entry("First Song")).unwrap();
    let mut app = app_with(vec![], store);
    assert_eq!(app.library_view.len(), 1);

    app.rate_selected("4").unwrap();
    assert_eq!(app.store.get("song1").unwrap().rating, Some(4));
    assert_eq!(app.library_view[0].1.rating, Some(4));
}

#[test]
fn invalid_rating_leaves_the_store_alone() {
    let dir = tempdir().unwrap();
    let mut store = empty_store(&dir);
    store.insert("song1", entry("First Song")).unwrap();
    let mut app = app_with(vec![], store);

    assert!(app.rate_selected("9").is_err());
    assert!(app.rate_selected("abc").is_err());
    assert_eq!(app.store.get("song1").unwrap().rating, None);
}

#[test]
fn lookup_reports_found_and_missing_keys() {
    let dir = tempdir().unwrap();
    let mut store = empty_store(&dir);
    store.insert("song1", entry("First Song")).unwrap();
    let mut app = app_with(vec![], store);

    app.lookup_key("song1");
    assert!(app.status.contains("First Song"));
    app.lookup_key("nope");
    assert!(app.status.contains("not found"));
}

#[test]
fn note_play_counts_library_tracks_only() {
    let dir = tempdir().unwrap();
    let media = dir.path().join("first.mp3");
    std::fs::write(&media, b"data").unwrap();
    let mut store = empty_store(&dir);
    let mut e = entry("First Song");
    e.file_path = media.display().to_string();
    store.insert("song1", e).unwrap();
    let mut app = app_with(vec![], store);

    let library_track = App::track_for_library("song1", &app.library_view[0].1.clone());
    app.note_play(&library_track);
    app.note_play(&library_track);
    assert_eq!(app.store.get("song1").unwrap().play_count, 2);

    let local_track = App::track_for_file(&file("a.mp3"));
    app.note_play(&local_track);
    assert_eq!(app.store.get("song1").unwrap().play_count, 2);
}

#[test]
fn note_play_skips_entries_whose_file_is_gone() {
    let dir = tempdir().unwrap();
    let mut store = empty_store(&dir);
    // entry() points at a path that does not exist on disk.
    store.insert("song1", entry("First Song")).unwrap();
    let mut app = app_with(vec![], store);

    let track = App::track_for_library("song1", &app.library_view[0].1.clone());
    app.note_play(&track);
    assert_eq!(app.store.get("song1").unwrap().play_count, 0);
}

#[test]
fn register_download_adds_a_library_entry_once() {
    let dir = tempdir().unwrap();
    let mut app = app_with(vec![], empty_store(&dir));

    let path = PathBuf::from("/downloads/Cool Song.mp3");
    app.register_download(&path, "Cool Song");
    let e = app.store.get("Cool Song").unwrap();
    assert_eq!(e.name, "Cool Song");
    assert_eq!(e.file_path, "/downloads/Cool Song.mp3");
    assert_eq!(app.library_view.len(), 1);

    // A re-download must not wipe accumulated stats.
    app.store.increment_play_count("Cool Song").unwrap();
    app.register_download(&path, "Cool Song");
    assert_eq!(app.store.get("Cool Song").unwrap().play_count, 1);
}

#[test]
fn volume_clamps_to_unit_range() {
    let dir = tempdir().unwrap();
    let mut app = app_with(vec![], empty_store(&dir));
    assert_eq!(app.adjust_volume(0.7), 1.0);
    assert_eq!(app.adjust_volume(-2.0), 0.0);
}

#[test]
fn track_builders_set_source_and_identity() {
    let f = file("a.mp3");
    let t = App::track_for_file(&f);
    assert_eq!(t.source, TrackSource::Local);
    assert_eq!(t.location, "/music/a.mp3");

    let hit = SearchHit {
        id: "abc".into(),
        title: "hit".into(),
        url: "https://www.youtube.com/watch?v=abc".into(),
        duration: Some(Duration::from_secs(90)),
    };
    let t = App::track_for_hit(&hit);
    assert_eq!(t.source, TrackSource::Stream);
    assert_eq!(t.location, hit.url);

    let t = App::track_for_library("song1", &entry("First Song"));
    assert_eq!(t.source, TrackSource::Library);
    assert_eq!(t.library_key.as_deref(), Some("song1"));

    let t = App::track_for_download("/downloads/x.mp3".into(), "x".into(), None);
    assert_eq!(t.source, TrackSource::Downloaded);
}
