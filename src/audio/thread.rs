use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::player::{Notification, SourceId};

use super::sink::{create_sink_at, probe_duration};
use super::types::{AudioCmd, LoadError};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<Notification>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in
                // debugging, but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device, every load will fail");
                None
            }
        };

        let interval = Duration::from_millis(audio_settings.position_interval_ms.max(10));
        let mut deck = Deck::new(stream, events, interval);

        loop {
            match rx.recv_timeout(interval) {
                Ok(AudioCmd::SetSource { source, path }) => deck.attach(source, path),
                Ok(AudioCmd::Play) => deck.play(),
                Ok(AudioCmd::Pause) => deck.pause(),
                Ok(AudioCmd::Seek(to)) => deck.seek(to),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    deck.shutdown(fade_out_ms);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    deck.shutdown(0);
                    break;
                }
            }
            deck.poll();
        }
        debug!("audio thread exiting");
    })
}

/// Everything the audio thread knows about the attached source.
struct Deck {
    stream: Option<OutputStream>,
    events: Sender<Notification>,
    interval: Duration,

    source: Option<SourceId>,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    paused: bool,
    ended: bool,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    last_report: Instant,
}

impl Deck {
    fn new(stream: Option<OutputStream>, events: Sender<Notification>, interval: Duration) -> Self {
        Self {
            stream,
            events,
            interval,
            source: None,
            path: None,
            sink: None,
            paused: true,
            ended: false,
            started_at: None,
            accumulated: Duration::ZERO,
            last_report: Instant::now(),
        }
    }

    fn emit(&self, notification: Notification) {
        // The receiver only goes away during shutdown.
        let _ = self.events.send(notification);
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn open_at(&self, start_at: Duration) -> Result<(Sink, Option<Duration>), LoadError> {
        let stream = self.stream.as_ref().ok_or(LoadError::NoOutputDevice)?;
        let path = self.path.as_deref().ok_or(LoadError::NoOutputDevice)?;
        create_sink_at(stream, path, start_at)
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn attach(&mut self, source: SourceId, path: PathBuf) {
        self.stop_sink();
        self.source = Some(source);
        self.path = Some(path);
        self.paused = true;
        self.ended = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;

        match self.open_at(Duration::ZERO) {
            Ok((sink, total)) => {
                self.sink = Some(sink);
                let total = total
                    .filter(|d| !d.is_zero())
                    .or_else(|| self.path.as_deref().and_then(probe_duration));
                info!(source = source.0, path = ?self.path, ?total, "source attached");
                if let Some(total) = total {
                    self.emit(Notification::MetadataLoaded {
                        source,
                        duration_seconds: total.as_secs_f64(),
                    });
                }
            }
            Err(e) => {
                warn!(source = source.0, error = %e, "source failed to load");
                self.emit(Notification::LoadFailed {
                    source,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn play(&mut self) {
        let Some(source) = self.source else {
            return;
        };

        // After the end of a track, or after a failed load, start over with a fresh sink.
        if self.sink.is_none() || self.ended {
            let start_at = if self.ended { Duration::ZERO } else { self.accumulated };
            match self.open_at(start_at) {
                Ok((sink, _)) => {
                    self.stop_sink();
                    self.sink = Some(sink);
                    self.accumulated = start_at;
                    self.ended = false;
                }
                Err(e) => {
                    warn!(source = source.0, error = %e, "cannot start playback");
                    self.emit(Notification::LoadFailed {
                        source,
                        reason: e.to_string(),
                    });
                    return;
                }
            }
        }

        if let Some(ref s) = self.sink {
            s.play();
            if self.paused {
                self.started_at = Some(Instant::now());
            }
            self.paused = false;
            self.last_report = Instant::now();
            self.emit(Notification::PlayStateConfirmed {
                source,
                playing: true,
            });
        }
    }

    fn pause(&mut self) {
        let Some(source) = self.source else {
            return;
        };
        if let Some(ref s) = self.sink {
            if !self.paused {
                s.pause();
                if let Some(st) = self.started_at.take() {
                    self.accumulated += st.elapsed();
                }
                self.paused = true;
            }
        }
        self.emit(Notification::PlayStateConfirmed {
            source,
            playing: false,
        });
    }

    fn seek(&mut self, to: Duration) {
        let Some(source) = self.source else {
            return;
        };

        // Scrubbing: rebuild the current sink and skip into the file.
        match self.open_at(to) {
            Ok((new_sink, _)) => {
                self.stop_sink();
                if self.paused {
                    self.started_at = None;
                } else {
                    new_sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(new_sink);
                self.accumulated = to;
                self.ended = false;
                self.emit(Notification::PositionChanged {
                    source,
                    seconds: to.as_secs_f64(),
                });
            }
            Err(e) => {
                warn!(source = source.0, error = %e, "seek failed");
                self.emit(Notification::LoadFailed {
                    source,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Periodic work: end-of-track detection and position reports.
    fn poll(&mut self) {
        let Some(source) = self.source else {
            return;
        };
        if self.paused {
            return;
        }

        let drained = self.sink.as_ref().is_some_and(|s| s.empty());
        if drained {
            debug!(source = source.0, "track ended");
            self.paused = true;
            self.ended = true;
            self.started_at = None;
            self.accumulated = Duration::ZERO;
            self.emit(Notification::Ended { source });
            return;
        }

        if self.last_report.elapsed() >= self.interval {
            self.last_report = Instant::now();
            self.emit(Notification::PositionChanged {
                source,
                seconds: self.elapsed().as_secs_f64(),
            });
        }
    }

    fn shutdown(&mut self, fade_out_ms: u64) {
        if let Some(ref s) = self.sink {
            if !self.paused {
                // Fade out gently before stopping.
                fade_out_sink(s, fade_out_ms);
            }
        }
        self.stop_sink();
        self.source = None;
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
