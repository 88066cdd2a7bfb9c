use tracing::info;

use crate::config;
use crate::player::{PlaybackController, PlayerError, Transport};

/// Apply playback defaults from settings right after mount.
pub fn apply_playback_defaults<T: Transport>(
    controller: &mut PlaybackController<T>,
    settings: &config::Settings,
) -> Result<(), PlayerError> {
    if let Some(index) = settings.playback.autoplay {
        info!(index, "autoplay");
        controller.select_track(index)?;
    }
    Ok(())
}
