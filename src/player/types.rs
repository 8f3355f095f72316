//! Player-facing small types and shared handles.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Which engine the current session delegates to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineKind {
    Local,
    RemoteStream,
}

#[derive(Debug)]
pub enum PlayerCmd {
    /// Start playing the playlist entry at the given index, or resume the
    /// current selection (index 0 when nothing was selected yet).
    Play(Option<usize>),
    /// Toggle pause/resume; equivalent to `Play(None)` when nothing is loaded.
    TogglePause,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i64),
    /// Poller-triggered advance; ignored when `generation` is stale.
    AutoAdvance { generation: u64 },
    /// Stop playback and reset the session.
    Stop,
    /// Stop playback and empty the playlist.
    ClearPlaylist,
    /// Set volume in 0.0..=1.0 on whichever engine is active.
    SetVolume(f32),
    /// Shut the player thread down.
    Quit,
}

/// Observable session snapshot shared with the UI and the poller.
///
/// For local playback, elapsed time is derived from the wall-clock baseline
/// (`started_at` + `accumulated`); the engine is never asked for a position.
/// For streams, the player thread refreshes `accumulated` from the sink's
/// native position and leaves `started_at` unset.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Currently playing playlist index (if any).
    pub index: Option<usize>,
    pub engine: EngineKind,
    pub playing: bool,
    pub paused: bool,
    pub duration: Option<Duration>,
    /// Bumped every time a new track starts; lets the poller fire
    /// auto-advance exactly once per track.
    pub generation: u64,
    /// Wall-clock baseline while local playback is running.
    pub started_at: Option<Instant>,
    /// Elapsed time accumulated before `started_at` (local), or the last
    /// native position sample (stream).
    pub accumulated: Duration,
}

impl PlaybackInfo {
    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            engine: EngineKind::Local,
            playing: false,
            paused: false,
            duration: None,
            generation: 0,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
