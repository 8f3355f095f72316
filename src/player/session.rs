//! Wall-clock transport arithmetic for the active session.
//!
//! The local engine has no trusted position query, so elapsed time is always
//! `accumulated + (now - started_at)`. Every pause/resume/seek recomputes the
//! baseline so that formula stays correct. All methods take `now` explicitly
//! so the arithmetic is testable without sleeping.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub(super) struct Session {
    started_at: Option<Instant>,
    accumulated: Duration,
    playing: bool,
    paused: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin playback from `offset`, resetting the baseline to `now`.
    pub fn start_at(&mut self, now: Instant, offset: Duration) {
        self.accumulated = offset;
        self.started_at = Some(now);
        self.playing = true;
        self.paused = false;
    }

    /// Freeze elapsed time at `now`.
    pub fn pause_at(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.duration_since(st);
        }
        self.playing = false;
        self.paused = true;
    }

    /// Continue from the frozen elapsed time; the new baseline is
    /// `now - elapsed_at_pause`, expressed via `accumulated`.
    pub fn resume_at(&mut self, now: Instant) {
        if self.paused {
            self.started_at = Some(now);
            self.playing = true;
            self.paused = false;
        }
    }

    /// Jump to `position`, preserving the current pause state.
    pub fn seek_to(&mut self, now: Instant, position: Duration) {
        self.accumulated = position;
        self.started_at = if self.playing { Some(now) } else { None };
    }

    pub fn stop(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.playing = false;
        self.paused = false;
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.duration_since(st))
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }
}

/// Clamp a relative seek. The lower bound is always zero; `max` caps the
/// result for local tracks with a known duration, while streams pass `None`
/// because their reported duration may be approximate.
pub(super) fn seek_target(current: Duration, delta_secs: i64, max: Option<Duration>) -> Duration {
    let target = if delta_secs >= 0 {
        current.saturating_add(Duration::from_secs(delta_secs as u64))
    } else {
        current.saturating_sub(Duration::from_secs(delta_secs.unsigned_abs()))
    };
    match max {
        Some(m) => target.min(m),
        None => target,
    }
}

/// Which entry plays after `current`, if any. `None` means the playlist is
/// exhausted and playback should stop.
pub(super) fn next_index(current: usize, len: usize) -> Option<usize> {
    let next = current + 1;
    (next < len).then_some(next)
}
