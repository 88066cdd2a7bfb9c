use std::{env, path::PathBuf};

use tracing_subscriber::filter::LevelFilter;

use super::schema::Settings;
use crate::catalog::{Catalog, builtin_tracks};

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `NOCTURNE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("NOCTURNE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.audio.position_interval_ms == 0 {
            return Err("audio.position_interval_ms must be >= 1".to_string());
        }
        if self.logging.level.parse::<LevelFilter>().is_err() {
            return Err(format!("logging.level {:?} is not a level", self.logging.level));
        }
        let catalog = self.build_catalog().map_err(|e| format!("catalog: {e}"))?;
        if let Some(i) = self.playback.autoplay {
            if i >= catalog.len() {
                return Err(format!(
                    "playback.autoplay {i} is out of range (catalog has {} tracks)",
                    catalog.len()
                ));
            }
        }
        Ok(())
    }

    /// The configured tracks, or the built-in ones when none are configured.
    pub fn build_catalog(&self) -> Result<Catalog, crate::catalog::CatalogError> {
        if self.catalog.tracks.is_empty() {
            Catalog::new(builtin_tracks())
        } else {
            Catalog::new(self.catalog.tracks.clone())
        }
    }

    pub fn media_dir(&self) -> PathBuf {
        self.catalog
            .media_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("media"))
    }

    /// Log file path: the configured one, or the XDG state default.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging.file.clone().or_else(default_log_path)
    }
}

/// Resolve the config path from `NOCTURNE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("NOCTURNE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/nocturne/config.toml`
/// or `~/.config/nocturne/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("nocturne").join("config.toml"))
}

/// `$XDG_STATE_HOME/nocturne/nocturne.log` or `~/.local/state/nocturne/nocturne.log`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("state"))
    } else {
        None
    };

    state_home.map(|d| d.join("nocturne").join("nocturne.log"))
}
