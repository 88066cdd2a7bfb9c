use tracing::warn;

use crate::config;

/// Load settings, falling back to defaults when the config is unusable.
///
/// Returns the problem as well so it can be logged once logging is up and
/// shown in the UI.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                (
                    config::Settings::default(),
                    Some(format!("invalid config, using defaults: {msg}")),
                )
            } else {
                (s, None)
            }
        }
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

pub fn report_config_problem(problem: Option<&str>) {
    if let Some(msg) = problem {
        warn!("{msg}");
    }
}
