//! services/tracker/src/adapters/storage.rs
//!
//! File-backed session storage: one JSON object per file, read and
//! rewritten whole. It implements the `SessionStorage` port from the
//! core crate. An absent or unreadable file reads as empty.

use async_trait::async_trait;
use expense_tracker_core::ports::{SessionStorage, StorageError, StorageResult};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// Durable key-value storage in a single JSON file.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates a new `FileStorage`. The file is created lazily on the
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_map(&self) -> StorageResult<Map<String, Value>> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|value| value.as_object().cloned())
                .unwrap_or_default()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(StorageError(err.to_string())),
        }
    }

    async fn write_map(&self, map: Map<String, Value>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError(err.to_string()))?;
        }
        let text = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|err| StorageError(err.to_string()))?;
        fs::write(&self.path, text)
            .await
            .map_err(|err| StorageError(err.to_string()))
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self
            .read_map()
            .await?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_map(map).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut map = self.read_map().await?;
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_map(map).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tracker-storage-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let storage = FileStorage::new(temp_file("missing"));
        assert_eq!(storage.get("token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_round_trip_through_the_file() {
        let path = temp_file("round-trip");
        let storage = FileStorage::new(path.clone());
        storage.set("token", "abc").await.unwrap();
        storage.set("user", r#"{"id":"1"}"#).await.unwrap();

        // A fresh adapter over the same path sees the same values.
        let reread = FileStorage::new(path.clone());
        assert_eq!(reread.get("token").await.unwrap().as_deref(), Some("abc"));
        assert_eq!(reread.get("user").await.unwrap().as_deref(), Some(r#"{"id":"1"}"#));

        storage.remove("token").await.unwrap();
        assert_eq!(storage.get("token").await.unwrap(), None);
        assert!(storage.get("user").await.unwrap().is_some());

        let _ = fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn corrupt_files_read_as_empty() {
        let path = temp_file("corrupt");
        fs::write(&path, "not json").await.unwrap();
        let storage = FileStorage::new(path.clone());
        assert_eq!(storage.get("token").await.unwrap(), None);
        let _ = fs::remove_file(path).await;
    }
}
