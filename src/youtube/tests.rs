use std::time::{Duration, Instant};

use super::download::{ProgressThrottle, is_url, parse_progress_line, sanitize_filename};
use super::search::parse_search_line;

#[test]
fn sanitize_filename_strips_disallowed_characters() {
    let name = sanitize_filename("Song: Test/Name?.mp3");
    assert_eq!(name, "Song TestName.mp3");
    assert!(
        name.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.() ".contains(c))
    );
}

#[test]
fn sanitize_filename_truncates_to_fifty_characters() {
    let long = "x".repeat(200);
    assert_eq!(sanitize_filename(&long).chars().count(), 50);
}

#[test]
fn sanitize_filename_keeps_allowed_punctuation() {
    assert_eq!(
        sanitize_filename("A-B_C.D (E) 5"),
        "A-B_C.D (E) 5"
    );
}

#[test]
fn is_url_only_accepts_http_schemes() {
    assert!(is_url("https://www.youtube.com/watch?v=abc"));
    assert!(is_url("http://example.com"));
    assert!(!is_url("never gonna give you up"));
    assert!(!is_url("ftp://example.com"));
}

#[test]
fn parse_progress_line_reads_downloaded_and_total() {
    assert_eq!(
        parse_progress_line("download:1024 4096 NA"),
        Some((1024, Some(4096)))
    );
}

#[test]
fn parse_progress_line_falls_back_to_estimate() {
    assert_eq!(
        parse_progress_line("download:500 NA 2000"),
        Some((500, Some(2000)))
    );
}

#[test]
fn parse_progress_line_handles_unknown_total() {
    assert_eq!(parse_progress_line("download:500 NA NA"), Some((500, None)));
}

#[test]
fn parse_progress_line_ignores_non_progress_output() {
    assert_eq!(parse_progress_line("[ExtractAudio] Destination: x.mp3"), None);
    assert_eq!(parse_progress_line("download:NA NA NA"), None);
}

#[test]
fn progress_throttle_enforces_minimum_interval() {
    let mut throttle = ProgressThrottle::new(Duration::from_millis(100));
    let t0 = Instant::now();

    assert!(throttle.ready_at(t0));
    assert!(!throttle.ready_at(t0 + Duration::from_millis(50)));
    assert!(throttle.ready_at(t0 + Duration::from_millis(150)));
    assert!(!throttle.ready_at(t0 + Duration::from_millis(200)));
}

#[test]
fn parse_search_line_maps_flat_playlist_entries() {
    let line = r#"{"id":"abc123","title":"A Song","url":"https://www.youtube.com/watch?v=abc123","duration":213.0,"thumbnails":[{"url":"https://i.ytimg.com/vi/abc123/default.jpg"}]}"#;
    let hit = parse_search_line(line).unwrap();
    assert_eq!(hit.id, "abc123");
    assert_eq!(hit.title, "A Song");
    assert_eq!(hit.url, "https://www.youtube.com/watch?v=abc123");
    assert_eq!(hit.duration, Some(Duration::from_secs(213)));
    assert_eq!(hit.display(), "A Song (3:33)");
}

#[test]
fn parse_search_line_builds_url_from_id_when_missing() {
    let line = r#"{"id":"abc123","title":"A Song","duration":null}"#;
    let hit = parse_search_line(line).unwrap();
    assert_eq!(hit.url, "https://www.youtube.com/watch?v=abc123");
    assert_eq!(hit.duration, None);
    assert_eq!(hit.display(), "A Song");
}

#[test]
fn parse_search_line_rejects_malformed_json() {
    assert!(parse_search_line("not json").is_err());
}
