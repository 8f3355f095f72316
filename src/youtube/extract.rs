use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::JukeboxError;

/// A temporarily materialized audio file plus the metadata that came with it.
#[derive(Debug, Clone)]
pub struct ExtractedAudio {
    pub path: PathBuf,
    pub title: String,
    pub duration: Option<Duration>,
    pub uploader: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    uploader: Option<String>,
}

/// Download a video's audio into `out_dir` (created if absent) and return
/// the produced file plus its metadata. The file is named by video id so the
/// caller can clean it up deterministically.
pub fn extract_audio(url: &str, out_dir: &Path, codec: &str) -> Result<ExtractedAudio, JukeboxError> {
    fs::create_dir_all(out_dir).map_err(|e| JukeboxError::load(url, e))?;

    let template = out_dir.join("%(id)s.%(ext)s");
    info!(url, "extracting audio");

    let output = Command::new("yt-dlp")
        .args(["-x", "--audio-format", codec, "--no-playlist", "--no-simulate", "-j", "-o"])
        .arg(&template)
        .arg(url)
        .output()
        .map_err(|e| JukeboxError::load(url, format!("failed to run yt-dlp: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(JukeboxError::load(
            url,
            stderr.lines().last().unwrap_or("yt-dlp failed"),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let info: RawInfo = stdout
        .lines()
        .find_map(|l| serde_json::from_str(l).ok())
        .ok_or_else(|| JukeboxError::load(url, "no metadata in yt-dlp output"))?;

    let path = out_dir.join(format!("{}.{}", info.id, codec));
    if !path.exists() {
        return Err(JukeboxError::load(
            url,
            format!("expected output file {} missing", path.display()),
        ));
    }

    Ok(ExtractedAudio {
        path,
        title: info.title.unwrap_or_else(|| "Unknown Title".to_string()),
        duration: info
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(Duration::from_secs_f64),
        uploader: info.uploader,
    })
}

/// Probe a URL or search directive for its metadata without downloading.
pub(super) fn probe_info(target: &str) -> Result<(String, String), JukeboxError> {
    let output = Command::new("yt-dlp")
        .args(["-j", "--no-playlist", target])
        .output()
        .map_err(|e| JukeboxError::DownloadFailure(format!("failed to run yt-dlp: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(JukeboxError::DownloadFailure(
            stderr.lines().last().unwrap_or("yt-dlp failed").to_string(),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let info: RawInfo = stdout
        .lines()
        .find_map(|l| serde_json::from_str(l).ok())
        .ok_or_else(|| JukeboxError::DownloadFailure("no metadata in yt-dlp output".to_string()))?;

    let title = info.title.unwrap_or_else(|| info.id.clone());
    Ok((info.id, title))
}
