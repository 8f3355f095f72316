//! Utilities for creating `rodio` sinks from audio files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::JukeboxError;

/// Create a paused `Sink` for the file at `path`, starting at `start_at`.
///
/// Open/decode failures surface as `LoadFailure` so a bad file never tears
/// down the running session.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<Sink, JukeboxError> {
    let file = File::open(path).map_err(|e| JukeboxError::load(path.display().to_string(), e))?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| JukeboxError::load(path.display().to_string(), e))?
        // `skip_duration` is the seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
