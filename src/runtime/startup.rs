use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::catalog::{Catalog, load_json, scan};
use crate::config::{
    self, BoundarySetting, LibrarySettings, PlayModeSetting, StateSettings, state_dir,
};
use crate::error::CatalogError;
use crate::playback::{FileIndexStore, PlayMode, SequentialBoundary};
use crate::player::PlayerOptions;

/// Command-line argument, then `library.catalog`, then the working directory.
pub fn catalog_source(arg: Option<String>, library: &LibrarySettings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| library.catalog.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"))
}

/// Scan `source` if it is a directory, otherwise read it as a JSON catalog.
pub fn load_catalog(source: &Path, library: &LibrarySettings) -> Result<Catalog, CatalogError> {
    let catalog = if source.is_dir() {
        Catalog::new(scan(source, library))?
    } else {
        load_json(source)?
    };
    info!(source = %source.display(), tracks = catalog.len(), "catalog loaded");
    Ok(catalog)
}

pub fn player_options(settings: &config::PlaybackSettings) -> PlayerOptions {
    PlayerOptions {
        mode: match settings.mode {
            PlayModeSetting::Sequential => PlayMode::Sequential,
            PlayModeSetting::Repeat => PlayMode::Repeat,
            PlayModeSetting::Shuffle => PlayMode::Shuffle,
        },
        boundary: match settings.boundary {
            BoundarySetting::Wrap => SequentialBoundary::Wrap,
            BoundarySetting::Stop => SequentialBoundary::Stop,
        },
        settle_delay: Duration::from_millis(settings.settle_delay_ms),
        volume: settings.initial_volume,
        autoplay: settings.autoplay,
    }
}

pub fn index_store(settings: &StateSettings) -> FileIndexStore {
    let path = settings
        .index_path
        .clone()
        .or_else(|| state_dir().map(|d| d.join("last_index")))
        .unwrap_or_else(|| PathBuf::from(".segue_last_index"));
    FileIndexStore::new(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::IndexStore;

    #[test]
    fn player_options_follow_playback_settings() {
        let settings = config::PlaybackSettings {
            mode: PlayModeSetting::Shuffle,
            boundary: BoundarySetting::Stop,
            settle_delay_ms: 250,
            initial_volume: 0.4,
            autoplay: true,
            ..config::PlaybackSettings::default()
        };
        let options = player_options(&settings);
        assert_eq!(options.mode, PlayMode::Shuffle);
        assert_eq!(options.boundary, SequentialBoundary::Stop);
        assert_eq!(options.settle_delay, Duration::from_millis(250));
        assert_eq!(options.volume, 0.4);
        assert!(options.autoplay);
    }

    #[test]
    fn command_line_wins_over_configured_catalog() {
        let library = LibrarySettings {
            catalog: Some(PathBuf::from("/srv/library.json")),
            ..LibrarySettings::default()
        };
        assert_eq!(
            catalog_source(Some("/tmp/other".to_string()), &library),
            PathBuf::from("/tmp/other")
        );
        assert_eq!(
            catalog_source(None, &library),
            PathBuf::from("/srv/library.json")
        );
    }

    #[test]
    fn json_file_is_read_and_empty_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("library.json");
        std::fs::write(
            &file,
            r#"[{"title": "One", "artist": "A", "cover": "", "audio": "one.mp3", "length": "1:00"}]"#,
        )
        .unwrap();

        let catalog = load_catalog(&file, &LibrarySettings::default()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tracks()[0].audio, dir.path().join("one.mp3"));

        let empty = dir.path().join("empty");
        std::fs::create_dir(&empty).unwrap();
        assert!(matches!(
            load_catalog(&empty, &LibrarySettings::default()),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn configured_index_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idx");
        let settings = StateSettings {
            index_path: Some(path.clone()),
        };
        let mut store = index_store(&settings);
        store.save(3).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "3");
    }
}
