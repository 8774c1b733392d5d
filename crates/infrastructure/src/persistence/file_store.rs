//! File-backed key-value store.
//!
//! Stands in for browser local storage in native builds. The whole store is
//! a single JSON document:
//!
//! ```json
//! {
//!   "access_token": "eyJhbGciOi...",
//!   "user": "{\"username\":\"treasurer\",\"role\":\"staff\"}"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sacco_application::ports::{FileSystem, FileSystemError, KeyValueStore, StoreError};
use tokio::sync::Mutex;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

const APP_DIR: &str = "sacco";
const FILE_NAME: &str = "session.json";

type Entries = BTreeMap<String, String>;

/// Key-value store persisted as one JSON file.
///
/// Every operation reads the file, so separate instances over the same path
/// see each other's writes. Mutations are serialized within an instance.
#[derive(Debug)]
pub struct FileKeyValueStore<F> {
    fs: F,
    path: PathBuf,
    lock: Mutex<()>,
}

impl<F: FileSystem> FileKeyValueStore<F> {
    /// Creates a store backed by the file at `path`.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the default store location under the user's data directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StoreError> {
        if !self.fs.exists(&self.path).await {
            return Ok(Entries::new());
        }
        let content = match self.fs.read_file(&self.path).await {
            Ok(content) => content,
            Err(FileSystemError::NotFound(_)) => return Ok(Entries::new()),
            Err(e) => return Err(StoreError::Io(e.into())),
        };
        from_json_bytes(&content).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn save(&self, entries: &Entries) -> Result<(), StoreError> {
        let content =
            to_json_stable_bytes(entries).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.fs
            .write_file(&self.path, &content)
            .await
            .map_err(|e| StoreError::Io(e.into()))
    }
}

impl<F: FileSystem> KeyValueStore for FileKeyValueStore<F> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await?;
        debug!(key, path = %self.path.display(), "store entry written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
            debug!(key, path = %self.path.display(), "store entry removed");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::TokioFileSystem;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileKeyValueStore<TokioFileSystem> {
        FileKeyValueStore::new(TokioFileSystem::new(), dir.path().join(FILE_NAME))
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.get("access_token").await.unwrap(), None);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn values_survive_a_new_instance() {
        let dir = TempDir::new().unwrap();
        store_in(&dir).set("access_token", "tok2").await.unwrap();

        let reopened = store_in(&dir);

        assert_eq!(
            reopened.get("access_token").await.unwrap().as_deref(),
            Some("tok2")
        );
    }

    #[tokio::test]
    async fn file_is_sorted_pretty_json() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("user", r#"{"username":"treasurer"}"#).await.unwrap();
        store.set("access_token", "tok1").await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();

        assert_eq!(
            content,
            "{\n  \"access_token\": \"tok1\",\n  \"user\": \"{\\\"username\\\":\\\"treasurer\\\"}\"\n}\n"
        );
    }

    #[tokio::test]
    async fn remove_of_absent_key_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.remove("user").await.unwrap();
        store.set("access_token", "tok1").await.unwrap();
        store.remove("user").await.unwrap();

        assert_eq!(store.get("access_token").await.unwrap().as_deref(), Some("tok1"));
    }

    #[tokio::test]
    async fn remove_clears_only_that_key() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("access_token", "tok1").await.unwrap();
        store.set("user", "{}").await.unwrap();

        store.remove("access_token").await.unwrap();

        assert_eq!(store.get("access_token").await.unwrap(), None);
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json").unwrap();

        let result = store.get("access_token").await;

        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn default_path_ends_with_session_file() {
        if let Some(path) = FileKeyValueStore::<TokioFileSystem>::default_path() {
            assert!(path.ends_with("sacco/session.json"));
        }
    }
}
