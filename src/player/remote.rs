//! The remote stream engine.
//!
//! `load` materializes a temp audio file through the extraction service,
//! then playback mirrors the local engine's contract. Unlike local playback,
//! position IS queried natively from the sink here, and `stop` deletes the
//! temp file best-effort.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use rodio::{OutputStream, Sink};
use tracing::{info, warn};

use crate::error::JukeboxError;
use crate::youtube::{ExtractedAudio, extract_audio};

use super::sink::create_sink_at;
use super::transitions::StopSeq;

pub(super) struct RemoteStreamEngine {
    temp_dir: PathBuf,
    codec: String,
    current: Option<ExtractedAudio>,
    sink: Option<Sink>,
    volume: f32,
}

impl RemoteStreamEngine {
    pub fn new(temp_dir: PathBuf, codec: String, volume: f32) -> Self {
        Self {
            temp_dir,
            codec,
            current: None,
            sink: None,
            volume,
        }
    }

    /// Fetch `url` into the temp directory and make it the current stream.
    /// Any prior temp file is cleaned up first. On failure the engine holds
    /// no stream, but the caller's session state is untouched.
    pub fn load(&mut self, url: &str) -> Result<(), JukeboxError> {
        self.stop();
        let extracted = extract_audio(url, &self.temp_dir, &self.codec)?;
        info!(title = %extracted.title, uploader = ?extracted.uploader, "stream ready");
        self.current = Some(extracted);
        Ok(())
    }

    pub fn title(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.title.as_str())
    }

    /// Start playback of the loaded temp file from the beginning.
    pub fn play(&mut self, stream: &OutputStream) -> Result<(), JukeboxError> {
        let current = self
            .current
            .as_ref()
            .ok_or_else(|| JukeboxError::load("stream engine", "no stream loaded"))?;
        let new_sink = create_sink_at(stream, &current.path, Duration::ZERO)?;
        new_sink.set_volume(self.volume);
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        new_sink.play();
        self.sink = Some(new_sink);
        Ok(())
    }

    pub fn pause(&self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
    }

    pub fn resume(&self) {
        if let Some(s) = &self.sink {
            s.play();
        }
    }

    /// Seek to an absolute position. The sink keeps reporting a consistent
    /// native position afterwards, which is why this engine seeks in place
    /// instead of rebuilding the sink.
    pub fn seek(&self, position: Duration) -> Result<(), JukeboxError> {
        if let Some(s) = &self.sink {
            s.try_seek(position)
                .map_err(|e| JukeboxError::load("stream engine", format!("seek failed: {e:?}")))?;
        }
        Ok(())
    }

    /// Native playback position of the temp file.
    pub fn position(&self) -> Duration {
        self.sink.as_ref().map_or(Duration::ZERO, |s| s.get_pos())
    }

    pub fn duration(&self) -> Option<Duration> {
        self.current.as_ref().and_then(|c| c.duration)
    }

    /// Stop playback and delete the temp file. Deletion is best-effort:
    /// failures are logged, never propagated.
    pub fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        if let Some(current) = self.current.take() {
            if let Err(e) = fs::remove_file(&current.path) {
                warn!(path = %current.path.display(), error = %e, "failed to remove temp stream file");
            }
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = &self.sink {
            s.set_volume(volume);
        }
    }
}

impl StopSeq for RemoteStreamEngine {
    fn silence(&mut self) {
        self.stop();
    }
}
