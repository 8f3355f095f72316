//! Background progress poller.
//!
//! A small thread samples the shared playback snapshot on a fixed interval,
//! pushes a rendered progress update to the UI and nudges the player when a
//! local track has run past its duration. Track-end detection is gated on
//! the snapshot's generation so each track ends at most once.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::player::{EngineKind, PlaybackHandle, PlaybackInfo, PlayerCmd};
use crate::runtime::UiMsg;

/// What the UI needs to render the transport line, precomputed so the draw
/// path does no time arithmetic.
#[derive(Debug, Clone, Default)]
pub struct ProgressSnapshot {
    pub index: Option<usize>,
    pub playing: bool,
    pub paused: bool,
    pub streaming: bool,
    /// Completed fraction in 0.0..=1.0; zero when the duration is unknown.
    pub fraction: f64,
    /// "m:ss / m:ss", with "-:--" standing in for an unknown duration.
    pub time_label: String,
}

pub fn format_mmss(d: Duration) -> String {
    let total = d.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

/// Fraction and "elapsed / total" label for the progress gauge.
pub fn progress_parts(elapsed: Duration, duration: Option<Duration>) -> (f64, String) {
    match duration {
        Some(total) if !total.is_zero() => {
            let fraction = (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0);
            (
                fraction,
                format!("{} / {}", format_mmss(elapsed.min(total)), format_mmss(total)),
            )
        }
        _ => (0.0, format!("{} / -:--", format_mmss(elapsed))),
    }
}

/// Whether this tick should tell the player to advance. Streams end on their
/// own; only local tracks with a known duration are advanced from here, and
/// `last_fired` makes it happen at most once per track generation.
fn should_advance(snapshot: &PlaybackInfo, elapsed: Duration, last_fired: Option<u64>) -> bool {
    snapshot.engine == EngineKind::Local
        && snapshot.playing
        && snapshot.duration.is_some_and(|d| elapsed >= d)
        && last_fired != Some(snapshot.generation)
}

pub fn spawn_poller(
    info: PlaybackHandle,
    player_tx: Sender<PlayerCmd>,
    ui_tx: Sender<UiMsg>,
    interval: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut last_fired_generation: Option<u64> = None;
        loop {
            thread::sleep(interval);
            let snapshot = match info.lock() {
                Ok(guard) => guard.clone(),
                Err(_) => break,
            };

            let elapsed = snapshot.elapsed();
            let (fraction, time_label) = progress_parts(elapsed, snapshot.duration);
            let progress = ProgressSnapshot {
                index: snapshot.index,
                playing: snapshot.playing,
                paused: snapshot.paused,
                streaming: snapshot.engine == EngineKind::RemoteStream,
                fraction,
                time_label,
            };
            if ui_tx.send(UiMsg::Progress(progress)).is_err() {
                break;
            }

            if should_advance(&snapshot, elapsed, last_fired_generation) {
                last_fired_generation = Some(snapshot.generation);
                if player_tx
                    .send(PlayerCmd::AutoAdvance {
                        generation: snapshot.generation,
                    })
                    .is_err()
                {
                    break;
                }
            }
        }
    })
}
