use std::path::PathBuf;

use serde::Deserialize;

use crate::catalog::Track;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/nocturne/config.toml` or `~/.config/nocturne/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `NOCTURNE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub catalog: CatalogSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often the audio thread reports the playhead while playing (milliseconds).
    pub position_interval_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            position_interval_ms: 250,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Show artwork refs in the details popup.
    pub show_cover_refs: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ MUSIC ARTIST ~ ".to_string(),
            show_cover_refs: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Delay between attaching a newly selected track and asking it to play.
    pub start_delay_ms: u64,
    /// Catalog index to start playing right after startup.
    pub autoplay: Option<usize>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            start_delay_ms: 100,
            autoplay: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory that relative `audio_ref`s are resolved against.
    /// Defaults to `./media`.
    pub media_dir: Option<PathBuf>,
    /// Replaces the built-in tracks when non-empty.
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enabled: bool,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/nocturne/nocturne.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}
