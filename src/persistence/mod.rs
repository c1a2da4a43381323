//! Local score storage
//!
//! Backends:
//! - `MemoryStore`: in-process, for tests and ephemeral sessions
//! - `JsonFileStore`: a JSON file on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Every backend stores the same JSON document, so a corrupted or
//! unreadable entry is reported as an error instead of silently reset.

use std::cell::RefCell;
use std::fmt;

use crate::highscores::HighScores;

/// Storage failure. Callers log and carry on.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    /// No storage backend reachable (private browsing, quota, ...)
    Unavailable,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "io error: {e}"),
            StoreError::Serde(e) => write!(f, "malformed score data: {e}"),
            StoreError::Unavailable => write!(f, "storage unavailable"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serde(e) => Some(e),
            StoreError::Unavailable => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serde(e)
    }
}

/// A place to keep high scores between sessions
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<HighScores>, StoreError>;
    fn save(&self, scores: &HighScores) -> Result<(), StoreError>;
}

impl<T: ScoreStore + ?Sized> ScoreStore for &T {
    fn load(&self) -> Result<Option<HighScores>, StoreError> {
        (**self).load()
    }

    fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
        (**self).save(scores)
    }
}

/// In-memory store holding the serialized document
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: RefCell<Option<String>>,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<HighScores>, StoreError> {
        match self.json.borrow().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
        *self.json.borrow_mut() = Some(serde_json::to_string(scores)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use super::{ScoreStore, StoreError};
    use crate::highscores::HighScores;

    /// High scores in a JSON file, written via a temp file and rename
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl ScoreStore for JsonFileStore {
        fn load(&self) -> Result<Option<HighScores>, StoreError> {
            match std::fs::read_to_string(&self.path) {
                Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
            if let Some(dir) = self.path.parent() {
                if !dir.as_os_str().is_empty() {
                    std::fs::create_dir_all(dir)?;
                }
            }
            let tmp = self.path.with_extension("tmp");
            std::fs::write(&tmp, serde_json::to_string_pretty(scores)?)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{ScoreStore, StoreError};
    use crate::highscores::HighScores;

    /// High scores in browser LocalStorage
    #[derive(Debug, Clone)]
    pub struct LocalStorageStore {
        key: String,
    }

    impl LocalStorageStore {
        /// LocalStorage key
        pub const DEFAULT_KEY: &'static str = "pyramid_highscores";

        pub fn new() -> Self {
            Self::with_key(Self::DEFAULT_KEY)
        }

        pub fn with_key(key: impl Into<String>) -> Self {
            Self { key: key.into() }
        }

        fn storage() -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StoreError::Unavailable)
        }
    }

    impl Default for LocalStorageStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ScoreStore for LocalStorageStore {
        fn load(&self) -> Result<Option<HighScores>, StoreError> {
            let storage = Self::storage()?;
            match storage.get_item(&self.key) {
                Ok(Some(json)) => Ok(Some(serde_json::from_str(&json)?)),
                Ok(None) => Ok(None),
                Err(_) => Err(StoreError::Unavailable),
            }
        }

        fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
            let storage = Self::storage()?;
            let json = serde_json::to_string(scores)?;
            storage
                .set_item(&self.key, &json)
                .map_err(|_| StoreError::Unavailable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HighScores {
        let mut scores = HighScores::new();
        scores.add_score(14, 3, 1_700_000_000_000.0);
        scores
    }

    #[test]
    fn test_memory_store_empty_then_saved() {
        let store = MemoryStore::default();
        assert!(store.load().unwrap().is_none());
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_memory_store_reports_corruption() {
        let store = MemoryStore::default();
        *store.json.borrow_mut() = Some("{ not json".to_string());
        assert!(matches!(store.load(), Err(StoreError::Serde(_))));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store() {
        let dir = std::env::temp_dir().join(format!("pyramid-store-{}", std::process::id()));
        let store = JsonFileStore::new(dir.join("scores.json"));
        assert!(store.load().unwrap().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        assert!(!store.path().with_extension("tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_legacy_document_without_best_loads() {
        let store = MemoryStore::default();
        *store.json.borrow_mut() = Some(r#"{"entries":[{"score":3,"timestamp":0.0}]}"#.to_string());
        let scores = store.load().unwrap().unwrap();
        assert_eq!(scores.best, 0);
        assert_eq!(scores.entries[0].perfect_drops, 0);
    }
}
