//! File-based storage: one JSON file per key.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each value as `<key>.json` in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    fn value_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, key: &str, value: &Value) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.value_path(key);
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::Serialization(e.to_string()));
        Box::pin(async move {
            fs::write(&path, json?).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<Value>>> {
        let path = self.value_path(key);
        Box::pin(async move {
            if !path.exists() {
                return Ok(None);
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&json).map(Some).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.value_path(key);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut keys: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
                .collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.value_path(key);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        block_on(storage.save("agriflow_layout", &json!([1, 2]))).unwrap();
        assert!(dir.path().join("agriflow_layout.json").exists());
        let loaded = block_on(storage.load("agriflow_layout")).unwrap();
        assert_eq!(loaded, Some(json!([1, 2])));
    }

    #[test]
    fn test_file_storage_missing() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        assert_eq!(block_on(storage.load("nonexistent")).unwrap(), None);
    }

    #[test]
    fn test_file_storage_corrupt() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let result = block_on(storage.load("broken"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        block_on(storage.save("doc2", &json!(2))).unwrap();
        block_on(storage.save("doc1", &json!(1))).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        assert_eq!(block_on(storage.list()).unwrap(), vec!["doc1", "doc2"]);

        block_on(storage.delete("doc1")).unwrap();
        assert!(!block_on(storage.exists("doc1")).unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_key() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        block_on(storage.save("invoice/113:draft", &json!("x"))).unwrap();
        assert!(dir.path().join("invoice_113_draft.json").exists());
        let loaded = block_on(storage.load("invoice/113:draft")).unwrap();
        assert_eq!(loaded, Some(json!("x")));
    }
}
