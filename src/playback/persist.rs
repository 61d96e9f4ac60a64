//! Remembering the last active track between sessions.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::StateError;

/// A single persisted entry: the last active catalog index.
pub trait IndexStore {
    /// The stored index, or `None` when missing or unreadable.
    fn load(&self) -> Option<usize>;
    fn save(&mut self, index: usize) -> Result<(), StateError>;
}

/// Keeps the index as plain text in one file.
pub struct FileIndexStore {
    path: PathBuf,
}

impl FileIndexStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl IndexStore for FileIndexStore {
    fn load(&self) -> Option<usize> {
        let text = fs::read_to_string(&self.path).ok()?;
        let index = text.trim().parse().ok();
        if index.is_none() {
            debug!(path = %self.path.display(), "ignoring unparsable saved index");
        }
        index
    }

    fn save(&mut self, index: usize) -> Result<(), StateError> {
        let write_err = |source| StateError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        fs::write(&self.path, index.to_string()).map_err(write_err)
    }
}
