use super::model::Track;

fn track(id: u32, title: &str, artist: &str, label: &str, cover: &str, audio: &str) -> Track {
    Track {
        id,
        title: title.to_string(),
        artist: artist.to_string(),
        duration_label: label.to_string(),
        cover_ref: cover.to_string(),
        audio_ref: audio.to_string(),
    }
}

/// The tracks compiled into the binary, used when the config does not
/// provide its own list. Audio refs are resolved against `catalog.media_dir`.
pub fn builtin_tracks() -> Vec<Track> {
    vec![
        track(
            1,
            "Cosmic Journey",
            "Space Explorer",
            "3:45",
            "covers/cosmic-journey.jpg",
            "cosmic-journey.wav",
        ),
        track(
            2,
            "Digital Dreams",
            "Neon Nights",
            "4:12",
            "covers/digital-dreams.jpg",
            "digital-dreams.wav",
        ),
        track(
            3,
            "Urban Beat",
            "City Pulse",
            "3:28",
            "covers/urban-beat.jpg",
            "urban-beat.wav",
        ),
    ]
}
