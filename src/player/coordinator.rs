//! The playback coordinator and its thread.
//!
//! One thread owns the audio output stream and both engines. Commands come
//! in over an mpsc channel; observable state goes out through the shared
//! `PlaybackHandle`. At most one engine is audible at any time: starting a
//! track on one engine stops the other before sound begins.

use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder};
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::error::JukeboxError;
use crate::library::probe_duration;
use crate::playlist::{Playlist, PlaylistHandle, Track};
use crate::runtime::UiMsg;

use super::local::LocalEngine;
use super::remote::RemoteStreamEngine;
use super::session::{Session, next_index, seek_target};
use super::transitions::{SeekSeq, StartSeq, bring_up, rebuild_for_seek};
use super::types::{EngineKind, PlaybackHandle, PlaybackInfo, PlayerCmd};

/// Handle to the player thread held by the UI side.
pub struct Player {
    tx: Sender<PlayerCmd>,
    info: PlaybackHandle,
    playlist: PlaylistHandle,
    join: Option<JoinHandle<()>>,
}

impl Player {
    /// Spawn the player thread and return the handles the rest of the
    /// application uses to talk to it.
    pub fn spawn(settings: &Settings, ui_tx: Sender<UiMsg>) -> Self {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let playlist: PlaylistHandle = Arc::new(Mutex::new(Playlist::new()));

        let thread_info = Arc::clone(&info);
        let thread_playlist = Arc::clone(&playlist);
        let volume = settings.playback.volume;
        let temp_dir = settings.stream.temp_dir.clone();
        let codec = settings.download.codec.clone();
        let tick = Duration::from_millis(settings.playback.poll_interval_ms);

        let join = thread::spawn(move || {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .expect("ERR: No audio output device");
            // rodio logs to stderr when OutputStream is dropped; noisy for a
            // TUI app.
            stream.log_on_drop(false);

            let mut coordinator = Coordinator {
                stream,
                playlist: thread_playlist,
                info: thread_info,
                local: LocalEngine::new(volume),
                remote: RemoteStreamEngine::new(temp_dir, codec, volume),
                session: Session::new(),
                engine: EngineKind::Local,
                current: None,
                generation: 0,
                ui_tx,
            };

            loop {
                match rx.recv_timeout(tick) {
                    Ok(PlayerCmd::Quit) => break,
                    Ok(cmd) => coordinator.handle(cmd),
                    // Idle tick: streams report position natively, so the
                    // published snapshot needs a periodic refresh.
                    Err(RecvTimeoutError::Timeout) => coordinator.refresh_stream_position(),
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            coordinator.shutdown();
        });

        Self {
            tx,
            info,
            playlist,
            join: Some(join),
        }
    }

    pub fn send(&self, cmd: PlayerCmd) {
        let _ = self.tx.send(cmd);
    }

    pub fn sender(&self) -> Sender<PlayerCmd> {
        self.tx.clone()
    }

    pub fn info(&self) -> PlaybackHandle {
        Arc::clone(&self.info)
    }

    pub fn playlist(&self) -> PlaylistHandle {
        Arc::clone(&self.playlist)
    }

    /// Ask the thread to exit and wait for it. Temp stream files are removed
    /// on the way out.
    pub fn shutdown(mut self) {
        let _ = self.tx.send(PlayerCmd::Quit);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

struct Coordinator {
    stream: OutputStream,
    playlist: PlaylistHandle,
    info: PlaybackHandle,
    local: LocalEngine,
    remote: RemoteStreamEngine,
    session: Session,
    engine: EngineKind,
    current: Option<usize>,
    generation: u64,
    ui_tx: Sender<UiMsg>,
}

impl Coordinator {
    fn handle(&mut self, cmd: PlayerCmd) {
        match cmd {
            PlayerCmd::Play(index) => self.play(index),
            PlayerCmd::TogglePause => self.toggle_pause(),
            PlayerCmd::SeekBy(delta) => self.seek_by(delta),
            PlayerCmd::AutoAdvance { generation } => self.auto_advance(generation),
            PlayerCmd::Stop => self.stop(),
            PlayerCmd::ClearPlaylist => self.clear_playlist(),
            PlayerCmd::SetVolume(v) => self.set_volume(v),
            PlayerCmd::Quit => unreachable!("handled by the thread loop"),
        }
    }

    /// Start the playlist entry at `index`, or the current/first entry when
    /// none is given. On failure the previous session keeps running.
    fn play(&mut self, index: Option<usize>) {
        let target = index.or(self.current).unwrap_or(0);
        let track = {
            let playlist = self.lock_playlist();
            playlist.get(target).cloned()
        };
        let Some(track) = track else {
            // Empty playlist or a stale index; nothing to do.
            debug!(index = target, "play target does not exist");
            return;
        };

        match self.start_track(target, &track) {
            Ok(()) => {
                info!(index = target, title = %track.title, "playback started");
                self.session.start_at(Instant::now(), Duration::ZERO);
                self.current = Some(target);
                self.generation += 1;
                self.publish();
            }
            Err(e) => self.report(e),
        }
    }

    fn start_track(&mut self, index: usize, track: &Track) -> Result<(), JukeboxError> {
        if track.source.is_stream() {
            bring_up(
                &mut StreamStart {
                    engine: &mut self.remote,
                    stream: &self.stream,
                    url: &track.location,
                },
                &mut self.local,
            )?;
            self.engine = EngineKind::RemoteStream;
            // The extractor knows this entry better than whatever queued it;
            // a direct URL in particular comes in titled by its URL.
            {
                let mut playlist = self.lock_playlist();
                if let Some(d) = self.remote.duration() {
                    playlist.set_duration(index, d);
                }
                if let Some(title) = self.remote.title() {
                    playlist.set_title(index, title.to_string());
                }
            }
        } else {
            bring_up(
                &mut LocalStart {
                    engine: &mut self.local,
                    stream: &self.stream,
                    path: Path::new(&track.location),
                },
                &mut self.remote,
            )?;
            self.engine = EngineKind::Local;
            // Library entries arrive without a duration; without one the
            // track would never auto-advance.
            if track.duration.is_none() {
                if let Some(d) = probe_duration(Path::new(&track.location)) {
                    self.lock_playlist().set_duration(index, d);
                }
            }
        }
        Ok(())
    }

    fn toggle_pause(&mut self) {
        if self.session.is_playing() {
            match self.engine {
                EngineKind::Local => self.local.pause(),
                EngineKind::RemoteStream => self.remote.pause(),
            }
            self.session.pause_at(Instant::now());
            self.publish();
        } else if self.session.is_paused() {
            match self.engine {
                EngineKind::Local => self.local.resume(),
                EngineKind::RemoteStream => self.remote.resume(),
            }
            self.session.resume_at(Instant::now());
            self.publish();
        } else {
            self.play(None);
        }
    }

    fn seek_by(&mut self, delta_secs: i64) {
        if self.current.is_none() {
            return;
        }
        let now = Instant::now();
        let result = match self.engine {
            EngineKind::Local => {
                let duration = self.lock_info().duration;
                let target = seek_target(self.session.elapsed_at(now), delta_secs, duration);
                self.seek_local(target).map(|()| target)
            }
            EngineKind::RemoteStream => {
                // Stream durations are estimates, so only the floor is
                // clamped; the backend rejects out-of-range targets itself.
                let target = seek_target(self.remote.position(), delta_secs, None);
                self.remote.seek(target).map(|()| target)
            }
        };
        match result {
            Ok(target) => {
                self.session.seek_to(now, target);
                debug!(?target, "seek applied");
                self.publish();
            }
            Err(e) => self.report(e),
        }
    }

    /// The local backend seeks by rebuilding the sink at the target offset.
    fn seek_local(&mut self, target: Duration) -> Result<(), JukeboxError> {
        rebuild_for_seek(
            &mut LocalSeek {
                engine: &mut self.local,
                stream: &self.stream,
            },
            target,
            self.session.is_paused(),
        )
    }

    /// Poller-reported end of a local track. The generation check makes the
    /// advance happen at most once per track even if several notifications
    /// are in flight.
    fn auto_advance(&mut self, generation: u64) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "stale auto-advance ignored");
            return;
        }
        let Some(current) = self.current else { return };
        let len = self.lock_playlist().len();
        match next_index(current, len) {
            Some(next) => self.play(Some(next)),
            None => self.stop(),
        }
    }

    fn stop(&mut self) {
        self.local.stop();
        self.remote.stop();
        self.session.stop();
        self.current = None;
        self.generation += 1;
        self.publish();
    }

    fn clear_playlist(&mut self) {
        self.stop();
        self.lock_playlist().clear();
        self.publish();
    }

    fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.local.set_volume(volume);
        self.remote.set_volume(volume);
    }

    fn refresh_stream_position(&mut self) {
        if self.engine == EngineKind::RemoteStream && self.session.is_playing() {
            self.publish();
        }
    }

    /// Write the current session state into the shared snapshot.
    ///
    /// Local playback publishes the wall-clock baseline and lets readers
    /// derive elapsed time themselves; streams publish the sink's native
    /// position with no baseline.
    fn publish(&mut self) {
        let duration = self
            .current
            .and_then(|i| self.lock_playlist().get(i).and_then(|t| t.duration));
        let mut info = self.lock_info();
        info.index = self.current;
        info.engine = self.engine;
        info.playing = self.session.is_playing();
        info.paused = self.session.is_paused();
        info.duration = duration;
        info.generation = self.generation;
        match self.engine {
            EngineKind::Local => {
                info.started_at = self.session.started_at();
                info.accumulated = self.session.accumulated();
            }
            EngineKind::RemoteStream => {
                info.started_at = None;
                info.accumulated = self.remote.position();
            }
        }
    }

    fn report(&self, err: JukeboxError) {
        error!(error = %err, "player command failed");
        let _ = self.ui_tx.send(UiMsg::Error(err.to_string()));
    }

    fn shutdown(&mut self) {
        self.local.stop();
        self.remote.stop();
    }

    fn lock_playlist(&self) -> std::sync::MutexGuard<'_, Playlist> {
        self.playlist.lock().unwrap()
    }

    fn lock_info(&self) -> std::sync::MutexGuard<'_, PlaybackInfo> {
        self.info.lock().unwrap()
    }
}

/// Binds the local engine to the output stream and a file path for one
/// start sequence.
struct LocalStart<'a> {
    engine: &'a mut LocalEngine,
    stream: &'a OutputStream,
    path: &'a Path,
}

impl StartSeq for LocalStart<'_> {
    fn load_track(&mut self) -> Result<(), JukeboxError> {
        self.engine.load(self.stream, self.path)
    }

    fn start_audio(&mut self) -> Result<(), JukeboxError> {
        self.engine.start()
    }
}

/// Binds the stream engine to the output stream and a URL for one start
/// sequence.
struct StreamStart<'a> {
    engine: &'a mut RemoteStreamEngine,
    stream: &'a OutputStream,
    url: &'a str,
}

impl StartSeq for StreamStart<'_> {
    fn load_track(&mut self) -> Result<(), JukeboxError> {
        self.engine.load(self.url)
    }

    fn start_audio(&mut self) -> Result<(), JukeboxError> {
        self.engine.play(self.stream)
    }
}

struct LocalSeek<'a> {
    engine: &'a mut LocalEngine,
    stream: &'a OutputStream,
}

impl SeekSeq for LocalSeek<'_> {
    fn rebuild_at(&mut self, offset: Duration) -> Result<(), JukeboxError> {
        self.engine.rebuild(self.stream, offset)
    }

    fn run(&mut self) {
        self.engine.resume();
    }
}
