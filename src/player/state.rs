use super::seek::progress_fraction;

/// Coarse controller state derived from the playing flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
}

/// Transient playback state owned by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    /// Intended playing flag, overwritten by transport confirmations.
    pub is_playing: bool,
    pub position_seconds: f64,
    /// `None` until the transport reports metadata for the current source.
    pub total_seconds: Option<f64>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            position_seconds: 0.0,
            total_seconds: None,
        }
    }
}

impl PlaybackState {
    pub fn phase(&self) -> Phase {
        if self.is_playing {
            Phase::Active
        } else {
            Phase::Idle
        }
    }

    /// Duration not yet known. Does not block any transition.
    pub fn is_loading(&self) -> bool {
        self.total_seconds.is_none()
    }

    pub fn progress(&self) -> f64 {
        progress_fraction(self.position_seconds, self.total_seconds)
    }

    /// Forget everything tied to the previous audio resource.
    pub(super) fn reset_progress(&mut self) {
        self.position_seconds = 0.0;
        self.total_seconds = None;
    }
}
