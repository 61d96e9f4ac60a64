//! Error types shared across the player.
//!
//! Playback errors never escape the control loop: callers log them and fall
//! back to a safe state (paused, unchanged index). Catalog and state errors
//! only surface during startup.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// The audio resource could not be bound or started.
    #[error("failed to load {path:?}: {reason}")]
    ResourceLoad { path: PathBuf, reason: String },

    /// A switch or setter targeted an index outside the catalog.
    #[error("index {index} out of range for {len} tracks")]
    IndexOutOfRange { index: i64, len: usize },

    /// An optional platform capability is not available.
    #[error("{feature} unavailable: {reason}")]
    Unsupported {
        feature: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("track {title:?} has an invalid length {length:?} (expected M:SS)")]
    InvalidLength { title: String, length: String },

    #[error("catalog is empty")]
    Empty,
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
