use std::path::PathBuf;
use std::time::Duration;

use crate::error::CatalogError;

use super::length::parse_length;

/// Immutable metadata and resource reference for one playable track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDescriptor {
    pub title: String,
    pub artist: String,
    /// Cover art URI; empty when unknown.
    pub cover: String,
    pub audio: PathBuf,
    /// Length as written in the catalog (`M:SS`).
    pub length: String,
    duration: Duration,
}

impl TrackDescriptor {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        cover: impl Into<String>,
        audio: impl Into<PathBuf>,
        length: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let title = title.into();
        let length = length.into();
        let Some(duration) = parse_length(&length) else {
            return Err(CatalogError::InvalidLength { title, length });
        };

        Ok(Self {
            title,
            artist: artist.into(),
            cover: cover.into(),
            audio: audio.into(),
            length,
            duration,
        })
    }

    /// Total length in whole seconds, parsed from `length`.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Ordered, non-empty list of tracks indexed `0..len()`.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<TrackDescriptor>,
}

impl Catalog {
    pub fn new(tracks: Vec<TrackDescriptor>) -> Result<Self, CatalogError> {
        if tracks.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn get(&self, index: usize) -> Option<&TrackDescriptor> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[TrackDescriptor] {
        &self.tracks
    }

    pub fn durations(&self) -> Vec<Duration> {
        self.tracks.iter().map(TrackDescriptor::duration).collect()
    }
}
