//! Opaque key-value persistence for saved games.
//!
//! A [`Store`] only moves strings around; the snapshot codec gives them
//! meaning. [`save_game`] and [`load_game`] glue the two together.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::DEFAULT_SAVE_KEY;
use crate::game::GameState;
use crate::snapshot::{self, SnapshotError};

/// Error from a [`Store`] or the save helpers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    /// Keys become file names, so path separators are refused.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    /// In-memory state is unusable.
    #[error("storage state is poisoned")]
    Poisoned,
    /// The stored blob is not a valid snapshot.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Persistence collaborator: save a blob under a key, load it back.
pub trait Store {
    /// Store `blob` under `key`, replacing any previous value.
    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError>;

    /// The blob stored under `key`, `None` if there is none.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Store for FileStore {
    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        let path = self.path_of(key)?;
        fs::create_dir_all(&self.dir)?;
        // Staged write, then rename over the target.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, blob)?;
        fs::rename(&staging, &path)?;
        tracing::debug!(path = %path.display(), bytes = blob.len(), "saved");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_of(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local store, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .blobs
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .get(key)
            .cloned())
    }
}

/// Save `state` as a snapshot under `key`, or [`DEFAULT_SAVE_KEY`] if `None`.
pub fn save_game(
    store: &dyn Store,
    key: Option<&str>,
    state: &GameState,
    updated_at: u64,
) -> Result<(), StoreError> {
    let text = snapshot::encode(state, updated_at)?;
    store.save(key.unwrap_or(DEFAULT_SAVE_KEY), &text)
}

/// Load the game saved under `key`, or [`DEFAULT_SAVE_KEY`] if `None`.
///
/// `Ok(None)` means nothing was saved; a corrupt save is an error and never
/// yields a partial state.
pub fn load_game(
    store: &dyn Store,
    key: Option<&str>,
) -> Result<Option<(GameState, u64)>, StoreError> {
    store
        .load(key.unwrap_or(DEFAULT_SAVE_KEY))?
        .map(|text| snapshot::decode(&text).map_err(StoreError::from))
        .transpose()
}
