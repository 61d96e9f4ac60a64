use std::env;
use std::path::PathBuf;

use ::config::{Config, ConfigError, Environment, File};

use super::schema::Settings;

const APP_DIR: &str = "segue";

impl Settings {
    /// Layer struct defaults, the optional config file and `SEGUE__*`
    /// environment variables (highest wins).
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix("SEGUE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject values the player cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.poll_interval_ms == 0 {
            return Err("playback.poll_interval_ms must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.playback.initial_volume) {
            return Err("playback.initial_volume must be in [0, 1]".to_string());
        }
        if !(self.controls.volume_step > 0.0 && self.controls.volume_step <= 1.0) {
            return Err("controls.volume_step must be in (0, 1]".to_string());
        }
        Ok(())
    }
}

/// `$<var>/segue`, or `~/<fallback>/segue` when the variable is unset.
fn xdg_app_dir(var: &str, fallback: &[&str]) -> Option<PathBuf> {
    let base = match env::var_os(var) {
        Some(dir) => PathBuf::from(dir),
        None => {
            let mut home = PathBuf::from(env::var_os("HOME")?);
            home.extend(fallback);
            home
        }
    };
    Some(base.join(APP_DIR))
}

/// `SEGUE_CONFIG_PATH` if set, otherwise [`default_config_path`].
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os("SEGUE_CONFIG_PATH")
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/segue/config.toml` or `~/.config/segue/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_app_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("config.toml"))
}

/// Directory for runtime state (last index, log file):
/// `$XDG_STATE_HOME/segue` or `~/.local/state/segue`.
pub fn state_dir() -> Option<PathBuf> {
    xdg_app_dir("XDG_STATE_HOME", &[".local", "state"])
}
