//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for tests and sessions that should not persist.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, value: &Value) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let value = value.clone();
        Box::pin(async move {
            let mut values = self.values.write().map_err(lock_error)?;
            values.insert(key, value);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<Value>>> {
        let key = key.to_string();
        Box::pin(async move {
            let values = self.values.read().map_err(lock_error)?;
            Ok(values.get(&key).cloned())
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut values = self.values.write().map_err(lock_error)?;
            values.remove(&key);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let values = self.values.read().map_err(lock_error)?;
            let mut keys: Vec<String> = values.keys().cloned().collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move {
            let values = self.values.read().map_err(lock_error)?;
            Ok(values.contains_key(&key))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use serde_json::json;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        block_on(storage.save("test", &json!({"a": 1}))).unwrap();
        let loaded = block_on(storage.load("test")).unwrap();
        assert_eq!(loaded, Some(json!({"a": 1})));
    }

    #[test]
    fn test_missing_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(block_on(storage.load("nonexistent")).unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let storage = MemoryStorage::new();
        block_on(storage.save("test", &json!(1))).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());
        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
        block_on(storage.delete("test")).unwrap();
    }

    #[test]
    fn test_list_sorted() {
        let storage = MemoryStorage::new();
        block_on(storage.save("b", &json!(2))).unwrap();
        block_on(storage.save("a", &json!(1))).unwrap();
        assert_eq!(block_on(storage.list()).unwrap(), vec!["a", "b"]);
    }
}
