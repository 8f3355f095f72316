//! Playback: the coordinator thread, the two engines and session math.
//!
//! The UI talks to a dedicated player thread over a `PlayerCmd` channel; the
//! thread owns the rodio output stream, the local-file engine and the remote
//! stream engine, and publishes an observable session snapshot through a
//! shared `PlaybackHandle`.

mod coordinator;
mod local;
mod remote;
mod session;
mod sink;
mod transitions;
mod types;

pub use coordinator::Player;
pub use types::{EngineKind, PlaybackHandle, PlaybackInfo, PlayerCmd};
