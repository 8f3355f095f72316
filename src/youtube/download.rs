use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::JukeboxError;

use super::extract::probe_info;

/// Minimum gap between UI-visible progress updates, so a fast download does
/// not flood the event channel.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Keep only letters, digits, `-_.() ` and cap the result at 50 characters.
pub fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "-_.() ".contains(*c))
        .take(50)
        .collect()
}

pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Rate-limits progress callbacks; the final sample should bypass it so the
/// bar always reaches 100%.
pub(super) struct ProgressThrottle {
    last: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    pub(super) fn new(min_interval: Duration) -> Self {
        Self {
            last: None,
            min_interval,
        }
    }

    pub(super) fn ready_at(&mut self, now: Instant) -> bool {
        match self.last {
            Some(prev) if now.duration_since(prev) < self.min_interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Parse one `--progress-template` line:
/// `download:<downloaded> <total> <total_estimate>` where absent fields print
/// as `NA`. Returns (bytes_downloaded, bytes_total).
pub(super) fn parse_progress_line(line: &str) -> Option<(u64, Option<u64>)> {
    let rest = line.trim().strip_prefix("download:")?;
    let mut parts = rest.split_whitespace();
    let downloaded = parts.next()?.parse::<u64>().ok()?;
    let total = parts
        .filter_map(|p| p.parse::<u64>().ok())
        .find(|t| *t > 0);
    Some((downloaded, total))
}

/// Persists a remote video's audio into the downloads directory.
pub struct Downloader {
    dir: PathBuf,
    codec: String,
    quality: String,
}

impl Downloader {
    pub fn new(dir: impl Into<PathBuf>, codec: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            codec: codec.into(),
            quality: quality.into(),
        }
    }

    /// Download `query_or_url` as audio and return the final file path plus
    /// its title. Non-URL input is treated as a search query and resolves to
    /// the top hit. `progress` receives `(bytes_downloaded, bytes_total)` at
    /// a throttled rate.
    pub fn download(
        &self,
        query_or_url: &str,
        mut progress: impl FnMut(u64, Option<u64>),
    ) -> Result<(PathBuf, String), JukeboxError> {
        let target = if is_url(query_or_url) {
            query_or_url.to_string()
        } else {
            format!("ytsearch1:{query_or_url}")
        };

        fs::create_dir_all(&self.dir)
            .map_err(|e| JukeboxError::DownloadFailure(e.to_string()))?;

        let (id, title) = probe_info(&target)?;
        let mut stem = sanitize_filename(&title);
        if stem.trim().is_empty() {
            stem = id;
        }
        let out_path = self.dir.join(format!("{stem}.{}", self.codec));
        let template = self.dir.join(format!("{stem}.%(ext)s"));

        info!(target, out = %out_path.display(), "downloading audio");

        let mut child = Command::new("yt-dlp")
            .args(["-x", "--audio-format", &self.codec, "--audio-quality", &self.quality])
            .args(["--no-playlist", "--newline", "--progress-template"])
            .arg("download:%(progress.downloaded_bytes)s %(progress.total_bytes)s %(progress.total_bytes_estimate)s")
            .arg("-o")
            .arg(&template)
            .arg(&target)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| JukeboxError::DownloadFailure(format!("failed to run yt-dlp: {e}")))?;

        let mut throttle = ProgressThrottle::new(PROGRESS_INTERVAL);
        let mut last_sample: Option<(u64, Option<u64>)> = None;
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                if let Some((downloaded, total)) = parse_progress_line(&line) {
                    last_sample = Some((downloaded, total));
                    if throttle.ready_at(Instant::now()) {
                        progress(downloaded, total);
                    }
                }
            }
        }
        // Final sample bypasses the throttle so the bar completes.
        if let Some((downloaded, total)) = last_sample {
            progress(downloaded, total);
        }

        let mut stderr_text = String::new();
        if let Some(mut stderr) = child.stderr.take() {
            let _ = stderr.read_to_string(&mut stderr_text);
        }
        let status = child
            .wait()
            .map_err(|e| JukeboxError::DownloadFailure(e.to_string()))?;

        if !status.success() {
            // Partially-written files must never reach the playlist.
            remove_partial(&out_path);
            return Err(JukeboxError::DownloadFailure(
                stderr_text
                    .lines()
                    .last()
                    .unwrap_or("yt-dlp failed")
                    .to_string(),
            ));
        }

        if !out_path.exists() {
            return Err(JukeboxError::DownloadFailure(format!(
                "expected output file {} missing",
                out_path.display()
            )));
        }

        Ok((out_path, title))
    }
}

fn remove_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove partial download");
        }
    }
}
