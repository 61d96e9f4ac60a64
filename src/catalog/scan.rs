use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::length::format_clock;
use super::model::TrackDescriptor;

const UNKNOWN_ARTIST: &str = "Unknown artist";
const COVER_STEMS: [&str; 3] = ["cover", "folder", "front"];
const COVER_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Look for a `cover.jpg`-style image next to `track` and return it as a `file://` URI.
fn sibling_cover(track: &Path) -> Option<String> {
    let dir = track.parent()?;
    COVER_STEMS
        .iter()
        .flat_map(|stem| COVER_EXTENSIONS.iter().map(move |ext| dir.join(format!("{stem}.{ext}"))))
        .find(|p| p.is_file())
        .map(|p| format!("file://{}", p.display()))
}

/// Round to the nearest whole second; catalog lengths have no fractions.
fn rounded(d: Duration) -> Duration {
    Duration::from_secs(d.as_secs_f64().round() as u64)
}

fn describe(path: &Path) -> Option<TrackDescriptor> {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable audio file");
            return None;
        }
    };

    let duration = rounded(tagged.properties().duration());
    if duration.is_zero() {
        warn!(path = %path.display(), "skipping audio file with no duration");
        return None;
    }

    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = UNKNOWN_ARTIST.to_string();

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = tag.title() {
            if !v.trim().is_empty() {
                title = v.trim().to_string();
            }
        }
        if let Some(v) = tag.artist() {
            if !v.trim().is_empty() {
                artist = v.trim().to_string();
            }
        }
    }

    let cover = sibling_cover(path).unwrap_or_default();
    TrackDescriptor::new(title, artist, cover, PathBuf::from(path), format_clock(duration)).ok()
}

/// Build catalog entries from the audio files under `dir`, sorted by artist then title.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<TrackDescriptor> {
    let mut tracks: Vec<TrackDescriptor> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            if let Some(track) = describe(path) {
                tracks.push(track);
            }
        }
    }

    tracks.sort_by_key(|t| format!("{} - {}", t.artist, t.title).to_lowercase());
    debug!(dir = %dir.display(), count = tracks.len(), "scanned library");
    tracks
}
