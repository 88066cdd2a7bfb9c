use crate::mpris::{MprisHandle, PlaybackStatus};
use crate::player::PlayerView;

/// MPRIS status for the current view.
///
/// Idle at the start of the track (after a stop, an end, or before anything
/// played) reads as Stopped.
pub fn playback_status(view: &PlayerView) -> PlaybackStatus {
    if view.is_playing {
        PlaybackStatus::Playing
    } else if view.last_error.is_some() || view.position_seconds <= 0.0 {
        PlaybackStatus::Stopped
    } else {
        PlaybackStatus::Paused
    }
}

pub fn update_mpris(mpris: &MprisHandle, view: &PlayerView) {
    mpris.set_track_metadata(view.current_track(), view.total_seconds);
    mpris.set_playback(playback_status(view));
}
