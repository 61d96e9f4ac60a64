use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/segue/config.toml` or `~/.config/segue/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SEGUE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub state: StateSettings,
    pub logging: LoggingSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Play mode at startup.
    pub mode: PlayModeSetting,
    /// What `next`/`previous` do past either end of the catalog in sequential mode.
    pub boundary: BoundarySetting,
    /// Fallback wait between binding a track and resuming playback (milliseconds).
    /// Only used when the audio backend cannot report readiness.
    pub settle_delay_ms: u64,
    /// How often the playback position is sampled (milliseconds).
    pub poll_interval_ms: u64,
    /// Volume at startup, `0.0..=1.0`.
    pub initial_volume: f32,
    /// Start playing the restored track right away.
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            mode: PlayModeSetting::Sequential,
            boundary: BoundarySetting::Wrap,
            settle_delay_ms: 1000,
            poll_interval_ms: 1000,
            initial_volume: 1.0,
            autoplay: false,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayModeSetting {
    #[serde(alias = "normal", alias = "resume", alias = "in-order")]
    Sequential,
    #[serde(alias = "repeat-one", alias = "loop-one")]
    Repeat,
    #[serde(alias = "random")]
    Shuffle,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundarySetting {
    #[serde(alias = "loop", alias = "loop-around")]
    Wrap,
    #[serde(alias = "clamp", alias = "no-loop")]
    Stop,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Volume change per up/down key press.
    pub volume_step: f32,
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            volume_step: 0.05,
            scrub_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Catalog used when no path is given on the command line.
    /// A `.json` file is read as a catalog; a directory is scanned.
    pub catalog: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            catalog: None,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Where the last active track index is remembered.
    /// Defaults to `$XDG_STATE_HOME/segue/last_index`.
    pub index_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enabled: bool,
    /// Log file; defaults to `$XDG_STATE_HOME/segue/segue.log`.
    pub path: Option<PathBuf>,
    /// `tracing` filter directive; `SEGUE_LOG` overrides it.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long transient messages (mode changes) stay visible (milliseconds).
    pub message_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ one track at a time ~ ".to_string(),
            message_ms: 1500,
        }
    }
}
