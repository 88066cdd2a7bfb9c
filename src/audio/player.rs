use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::AudioSettings;
use crate::player::{Notification, SourceId, Transport, TransportError};

use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// Handle to the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    media_dir: PathBuf,
    quit_fade_out: Duration,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Notifications arrive on the returned receiver.
    pub fn new(audio_settings: AudioSettings, media_dir: PathBuf) -> (Self, Receiver<Notification>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<Notification>();
        let quit_fade_out = Duration::from_millis(audio_settings.quit_fade_out_ms);

        let audio_handle = spawn_audio_thread(rx, events_tx, audio_settings);

        let player = Self {
            tx,
            media_dir,
            quit_fade_out,
            join: Mutex::new(Some(audio_handle)),
        };
        (player, events_rx)
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), TransportError> {
        self.tx.send(cmd).map_err(|_| TransportError::Disconnected)
    }

    /// Ask the audio thread to fade out and wait for it to finish.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

/// Resolve a catalog audio ref to a file: absolute refs are used as-is,
/// relative ones live under `media_dir`.
pub fn resolve_audio_ref(media_dir: &Path, audio_ref: &str) -> PathBuf {
    let p = Path::new(audio_ref);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        media_dir.join(p)
    }
}

impl Transport for AudioPlayer {
    fn set_source(&mut self, source: SourceId, audio_ref: &str) -> Result<(), TransportError> {
        let path = resolve_audio_ref(&self.media_dir, audio_ref);
        debug!(source = source.0, path = %path.display(), "set source");
        self.send(AudioCmd::SetSource { source, path })
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) -> Result<(), TransportError> {
        self.send(AudioCmd::Pause)
    }

    fn set_position(&mut self, seconds: f64) -> Result<(), TransportError> {
        let to = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::ZERO);
        self.send(AudioCmd::Seek(to))
    }

    fn release(&mut self) {
        self.quit_softly(self.quit_fade_out);
    }
}
