//! The local-file playback engine.
//!
//! Thin wrapper over a rodio sink for a single loaded file. The engine does
//! not track position; the coordinator's session arithmetic is the source of
//! truth for elapsed time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{OutputStream, Sink};

use crate::error::JukeboxError;

use super::sink::create_sink_at;
use super::transitions::StopSeq;

pub(super) struct LocalEngine {
    path: Option<PathBuf>,
    sink: Option<Sink>,
    volume: f32,
}

impl LocalEngine {
    pub fn new(volume: f32) -> Self {
        Self {
            path: None,
            sink: None,
            volume,
        }
    }

    /// Load `path`, replacing any previously loaded track. The new sink is
    /// built paused, and built before the old one is stopped, so an
    /// unreadable file leaves the running playback untouched.
    pub fn load(&mut self, stream: &OutputStream, path: &Path) -> Result<(), JukeboxError> {
        let new_sink = create_sink_at(stream, path, Duration::ZERO)?;
        new_sink.set_volume(self.volume);
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.sink = Some(new_sink);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Make the sink built by `load` audible.
    pub fn start(&mut self) -> Result<(), JukeboxError> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| JukeboxError::load("local engine", "no track loaded"))?;
        sink.play();
        Ok(())
    }

    /// Swap in a new sink at `offset`, which is how seeking works with this
    /// backend. The new sink stays paused until `resume`.
    pub fn rebuild(&mut self, stream: &OutputStream, offset: Duration) -> Result<(), JukeboxError> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| JukeboxError::load("local engine", "no track loaded"))?;
        let new_sink = create_sink_at(stream, &path, offset)?;
        new_sink.set_volume(self.volume);
        if let Some(old) = self.sink.take() {
            old.stop();
        }
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

    pub fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.path = None;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = &self.sink {
            s.set_volume(volume);
        }
    }
}

impl StopSeq for LocalEngine {
    fn silence(&mut self) {
        self.stop();
    }
}
