use std::process::Command;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::JukeboxError;

/// One search result row, in the order the service returned them.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub url: String,
    pub duration: Option<Duration>,
}

impl SearchHit {
    /// "Title (m:ss)" line for the results list.
    pub fn display(&self) -> String {
        match self.duration {
            Some(d) => {
                let secs = d.as_secs();
                format!("{} ({}:{:02})", self.title, secs / 60, secs % 60)
            }
            None => self.title.clone(),
        }
    }
}

// Raw shape of one `--flat-playlist --dump-json` line.
#[derive(Debug, Deserialize)]
struct RawEntry {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// Parse one JSON line of search output into a `SearchHit`.
pub(super) fn parse_search_line(line: &str) -> Result<SearchHit, JukeboxError> {
    let raw: RawEntry =
        serde_json::from_str(line).map_err(|e| JukeboxError::SearchFailure(e.to_string()))?;

    let url = raw
        .url
        .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", raw.id));
    let title = raw.title.unwrap_or_else(|| raw.id.clone());
    let duration = raw
        .duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(Duration::from_secs_f64);
    Ok(SearchHit {
        id: raw.id,
        title,
        url,
        duration,
    })
}

/// Search the video service, returning at most `max_results` hits in service
/// order. Service/network failures surface as `SearchFailure` and leave the
/// results list empty.
pub fn search(query: &str, max_results: usize) -> Result<Vec<SearchHit>, JukeboxError> {
    let directive = format!("ytsearch{max_results}:{query}");
    info!(query, max_results, "searching");

    let output = Command::new("yt-dlp")
        .args(["--dump-json", "--flat-playlist", &directive])
        .output()
        .map_err(|e| JukeboxError::SearchFailure(format!("failed to run yt-dlp: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(JukeboxError::SearchFailure(
            stderr.lines().last().unwrap_or("yt-dlp failed").to_string(),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut hits = Vec::new();
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        hits.push(parse_search_line(line)?);
    }
    Ok(hits)
}
