use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Track};

use super::seek::seek_target;
use super::state::{Phase, PlaybackState};
use super::transport::{Notification, SourceId, Transport, TransportError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("track index {index} is out of range (catalog has {len} tracks)")]
    InvalidTrackIndex { index: usize, len: usize },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Read-only snapshot consumed by the presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    pub catalog: &'a Catalog,
    pub current_index: usize,
    pub is_playing: bool,
    pub phase: Phase,
    /// Duration not yet reported for the attached source.
    pub loading: bool,
    pub position_seconds: f64,
    pub total_seconds: Option<f64>,
    pub progress: f64,
    pub last_error: Option<&'a str>,
}

impl<'a> PlayerView<'a> {
    pub fn current_track(&self) -> Option<&'a Track> {
        self.catalog.get(self.current_index)
    }
}

/// The playback state machine.
///
/// User intents update the intended state and issue transport commands;
/// notifications overwrite the fields the transport is authoritative for.
/// Notifications from a source other than the attached one are dropped.
pub struct PlaybackController<T: Transport> {
    catalog: Catalog,
    transport: T,
    state: PlaybackState,
    source: SourceId,
    start_delay: Duration,
    pending_start: Option<Instant>,
    last_error: Option<String>,
    released: bool,
}

impl<T: Transport> PlaybackController<T> {
    /// Mount the controller: attach the first track without starting it.
    pub fn mount(
        catalog: Catalog,
        mut transport: T,
        start_delay: Duration,
    ) -> Result<Self, PlayerError> {
        let source = SourceId::default().next();
        if let Some(track) = catalog.get(0) {
            transport.set_source(source, &track.audio_ref)?;
        }

        Ok(Self {
            catalog,
            transport,
            state: PlaybackState::default(),
            source,
            start_delay,
            pending_start: None,
            last_error: None,
            released: false,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.catalog.get(self.state.current_index)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True while a selected track is waiting for its deferred start.
    pub fn start_pending(&self) -> bool {
        self.pending_start.is_some()
    }

    pub fn view(&self) -> PlayerView<'_> {
        PlayerView {
            catalog: &self.catalog,
            current_index: self.state.current_index,
            is_playing: self.state.is_playing,
            phase: self.state.phase(),
            loading: self.state.is_loading(),
            position_seconds: self.state.position_seconds,
            total_seconds: self.state.total_seconds,
            progress: self.state.progress(),
            last_error: self.last_error.as_deref(),
        }
    }

    #[cfg(test)]
    pub(crate) fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Switch to track `index` and start it once the start delay has passed.
    pub fn select_track(&mut self, index: usize) -> Result<(), PlayerError> {
        let Some(track) = self.catalog.get(index) else {
            return Err(PlayerError::InvalidTrackIndex {
                index,
                len: self.catalog.len(),
            });
        };

        self.source = self.source.next();
        info!(index, id = track.id, title = %track.title, source = self.source.0, "selecting track");

        self.state.current_index = index;
        self.state.reset_progress();
        self.state.is_playing = true;
        self.last_error = None;
        self.pending_start = None;

        self.transport.set_source(self.source, &track.audio_ref)?;

        if self.start_delay.is_zero() {
            self.transport.play()?;
        } else {
            self.pending_start = Some(Instant::now() + self.start_delay);
        }
        Ok(())
    }

    pub fn next_track(&mut self) -> Result<(), PlayerError> {
        self.select_track(self.catalog.next_index(self.state.current_index))
    }

    pub fn previous_track(&mut self) -> Result<(), PlayerError> {
        self.select_track(self.catalog.prev_index(self.state.current_index))
    }

    pub fn toggle_play(&mut self) -> Result<(), PlayerError> {
        if self.state.is_playing {
            self.pause()
        } else {
            self.play()
        }
    }

    pub fn play(&mut self) -> Result<(), PlayerError> {
        if self.state.is_playing {
            return Ok(());
        }
        self.pending_start = None;
        self.transport.play()?;
        self.state.is_playing = true;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PlayerError> {
        if !self.state.is_playing {
            return Ok(());
        }
        self.pending_start = None;
        self.transport.pause()?;
        self.state.is_playing = false;
        Ok(())
    }

    /// Issue the deferred "play" of a freshly selected track once due.
    pub fn tick(&mut self, now: Instant) -> Result<(), PlayerError> {
        match self.pending_start {
            Some(due) if now >= due => {
                self.pending_start = None;
                debug!(source = self.source.0, "issuing deferred play");
                self.transport.play()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Seek to `fraction` of the current track.
    ///
    /// Returns the target position, or `None` when the duration is not yet
    /// known and the request was ignored.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<Option<f64>, PlayerError> {
        let Some(target) = seek_target(fraction, self.state.total_seconds) else {
            debug!(fraction, "ignoring seek while duration is unknown");
            return Ok(None);
        };
        self.transport.set_position(target)?;
        self.state.position_seconds = target;
        Ok(Some(target))
    }

    /// Scrub by `delta` seconds relative to the current position.
    pub fn seek_by(&mut self, delta: f64) -> Result<Option<f64>, PlayerError> {
        let Some(total) = self.state.total_seconds.filter(|t| *t > 0.0) else {
            return Ok(None);
        };
        let target = (self.state.position_seconds + delta).clamp(0.0, total);
        self.seek_to_fraction(target / total)
    }

    /// Apply a transport notification. Returns `false` if it was stale.
    pub fn handle(&mut self, notification: Notification) -> bool {
        if notification.source() != self.source {
            debug!(
                stale = notification.source().0,
                current = self.source.0,
                "dropping notification from detached source"
            );
            return false;
        }

        match notification {
            Notification::PositionChanged { seconds, .. } => {
                self.state.position_seconds = seconds;
            }
            Notification::MetadataLoaded {
                duration_seconds, ..
            } => {
                debug!(duration_seconds, "metadata loaded");
                self.state.total_seconds = Some(duration_seconds);
            }
            Notification::Ended { .. } => {
                self.state.is_playing = false;
                self.state.position_seconds = 0.0;
            }
            Notification::PlayStateConfirmed { playing, .. } => {
                self.state.is_playing = playing;
                if playing {
                    self.last_error = None;
                }
            }
            Notification::LoadFailed { reason, .. } => {
                warn!(index = self.state.current_index, %reason, "failed to load track");
                self.state.is_playing = false;
                self.pending_start = None;
                self.last_error = Some(reason);
            }
        }
        true
    }

    /// Release the transport. Further calls are no-ops.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.pending_start = None;
            self.transport.release();
        }
    }
}

impl<T: Transport> Drop for PlaybackController<T> {
    fn drop(&mut self) {
        self.release();
    }
}
