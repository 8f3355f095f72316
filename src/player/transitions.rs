//! Ordering rules for engine hand-offs and seeks.
//!
//! The rodio-backed engines sit behind these small traits so the sequencing
//! itself carries no audio types. `bring_up` encodes the one-audible-engine
//! invariant; `rebuild_for_seek` encodes pause preservation.

use std::time::Duration;

use crate::error::JukeboxError;

/// Incoming side of a track start.
pub(super) trait StartSeq {
    /// Fetch or open the track without making any sound.
    fn load_track(&mut self) -> Result<(), JukeboxError>;
    /// Begin audible playback of the loaded track.
    fn start_audio(&mut self) -> Result<(), JukeboxError>;
}

/// Outgoing side of a track start.
pub(super) trait StopSeq {
    fn silence(&mut self);
}

/// Start `incoming` and silence `outgoing`, in that dependency order: the
/// load runs first, so a failed fetch leaves current playback untouched,
/// and the outgoing engine falls silent before the incoming one makes any
/// sound.
pub(super) fn bring_up(
    incoming: &mut impl StartSeq,
    outgoing: &mut impl StopSeq,
) -> Result<(), JukeboxError> {
    incoming.load_track()?;
    outgoing.silence();
    incoming.start_audio()
}

/// An engine that seeks by swapping in a freshly built output.
pub(super) trait SeekSeq {
    /// Swap in a new, not-yet-running output positioned at `offset`.
    fn rebuild_at(&mut self, offset: Duration) -> Result<(), JukeboxError>;
    /// Start the swapped-in output.
    fn run(&mut self);
}

/// Seek by rebuild. The new output starts only when the session is not
/// paused; seeking never changes the play/pause state.
pub(super) fn rebuild_for_seek(
    engine: &mut impl SeekSeq,
    target: Duration,
    paused: bool,
) -> Result<(), JukeboxError> {
    engine.rebuild_at(target)?;
    if !paused {
        engine.run();
    }
    Ok(())
}
