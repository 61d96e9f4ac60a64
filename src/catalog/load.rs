use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CatalogError;

use super::model::{Catalog, TrackDescriptor};

/// One entry of a JSON catalog file, before validation.
#[derive(Debug, Deserialize)]
struct RawTrack {
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    cover: String,
    audio: PathBuf,
    length: String,
}

/// Load a JSON catalog from `path`.
///
/// Relative `audio` references resolve against the catalog file's directory.
pub fn load_json(path: &Path) -> Result<Catalog, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&text, path)
}

pub(super) fn from_json(text: &str, path: &Path) -> Result<Catalog, CatalogError> {
    let raw: Vec<RawTrack> = serde_json::from_str(text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let tracks = raw
        .into_iter()
        .map(|t| {
            let audio = if t.audio.is_relative() {
                base.join(&t.audio)
            } else {
                t.audio
            };
            TrackDescriptor::new(t.title, t.artist, t.cover, audio, t.length)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Catalog::new(tracks)
}
