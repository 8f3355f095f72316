use super::store::{LibraryEntry, MetadataStore, parse_rating};
use crate::error::JukeboxError;
use tempfile::tempdir;

fn entry(name: &str) -> LibraryEntry {
    LibraryEntry {
        name: name.to_string(),
        artist: "Artist".to_string(),
        rating: None,
        play_count: 0,
        file_path: format!("/music/{name}.mp3"),
    }
}

#[test]
fn open_missing_file_yields_empty_store() {
    let dir = tempdir().unwrap();
    let store = MetadataStore::open(dir.path().join("library.json")).unwrap();
    assert!(store.get("1").is_none());
}

#[test]
fn entries_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.json");

    let mut store = MetadataStore::open(&path).unwrap();
    store.insert("42", entry("Song")).unwrap();
    store.update_rating("42", 3).unwrap();
    store.increment_play_count("42").unwrap();
    drop(store);

    let store = MetadataStore::open(&path).unwrap();
    let e = store.get("42").unwrap();
    assert_eq!(e.name, "Song");
    assert_eq!(e.rating, Some(3));
    assert_eq!(e.play_count, 1);
}

#[test]
fn update_rating_rejects_out_of_range_and_leaves_store_unchanged() {
    let dir = tempdir().unwrap();
    let mut store = MetadataStore::open(dir.path().join("library.json")).unwrap();
    store.insert("1", entry("Song")).unwrap();
    store.update_rating("1", 4).unwrap();

    assert!(matches!(
        store.update_rating("1", 6),
        Err(JukeboxError::RatingValidation)
    ));
    assert!(matches!(
        store.update_rating("1", 0),
        Err(JukeboxError::RatingValidation)
    ));
    assert_eq!(store.get("1").unwrap().rating, Some(4));
}

#[test]
fn update_rating_does_not_touch_play_count() {
    let dir = tempdir().unwrap();
    let mut store = MetadataStore::open(dir.path().join("library.json")).unwrap();
    store.insert("1", entry("Song")).unwrap();
    store.increment_play_count("1").unwrap();

    store.update_rating("1", 4).unwrap();
    assert_eq!(store.get("1").unwrap().play_count, 1);
}

#[test]
fn increment_play_count_adds_exactly_one_per_call() {
    let dir = tempdir().unwrap();
    let mut store = MetadataStore::open(dir.path().join("library.json")).unwrap();
    store.insert("1", entry("Song")).unwrap();

    assert_eq!(store.increment_play_count("1").unwrap(), 1);
    assert_eq!(store.increment_play_count("1").unwrap(), 2);
}

#[test]
fn missing_keys_report_not_found() {
    let dir = tempdir().unwrap();
    let mut store = MetadataStore::open(dir.path().join("library.json")).unwrap();

    assert!(matches!(
        store.update_rating("nope", 3),
        Err(JukeboxError::MetadataNotFound(_))
    ));
    assert!(matches!(
        store.increment_play_count("nope"),
        Err(JukeboxError::MetadataNotFound(_))
    ));
}

#[test]
fn parse_rating_accepts_inclusive_range_only() {
    assert_eq!(parse_rating("4").unwrap(), 4);
    assert_eq!(parse_rating(" 1 ").unwrap(), 1);
    assert!(parse_rating("6").is_err());
    assert!(parse_rating("0").is_err());
    assert!(parse_rating("abc").is_err());
    assert!(parse_rating("").is_err());
}
