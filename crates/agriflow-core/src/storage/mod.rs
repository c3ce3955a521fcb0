//! Key-value persistence boundary.
//!
//! Catalogs, saved invoices, layouts and configuration are stored as JSON
//! values under string keys. A missing key is a normal condition: callers
//! start from defaults.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Key of the saved item catalog.
pub const CATALOG_KEY: &str = "agriflow_items_v2";
/// Key of the designer configuration.
pub const CONFIG_KEY: &str = "agriflow_config";
/// Key of the last saved layout.
pub const LAYOUT_KEY: &str = "agriflow_layout";

/// Key under which the invoice numbered `number` is saved.
pub fn invoice_key(number: &str) -> String {
    format!("agriflow_invoice_{}", number.trim())
}

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Key-value storage backend holding JSON values.
pub trait Storage: Send + Sync {
    /// Save `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &Value) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the value under `key`; `None` when nothing was saved.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<Value>>>;

    /// Delete the value under `key`. Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Serialize `value` and save it under `key`.
pub async fn save_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let json =
        serde_json::to_value(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    storage.save(key, &json).await?;
    log::info!("Saved {key}");
    Ok(())
}

/// Load and deserialize the value under `key`.
///
/// Returns `Ok(None)` when the key is absent and a serialization error when
/// the stored value does not match `T`.
pub async fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> StorageResult<Option<T>> {
    match storage.load(key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("{key}: {e}"))),
        None => Ok(None),
    }
}

/// Load the value under `key`, falling back to `T::default()`.
///
/// Absence and unreadable data are not errors here; the latter is logged.
pub async fn load_or_default<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    match load_json(storage, key).await {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::debug!("Nothing stored under {key}, using defaults");
            T::default()
        }
        Err(e) => {
            log::warn!("Ignoring stored {key}: {e}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ShapeStore;
    use pollster::block_on;
    use serde_json::json;

    #[test]
    fn test_invoice_key() {
        assert_eq!(invoice_key("113"), "agriflow_invoice_113");
        assert_eq!(invoice_key(" 7 "), "agriflow_invoice_7");
    }

    #[test]
    fn test_load_or_default_missing() {
        let storage = MemoryStorage::new();
        let store: ShapeStore = block_on(load_or_default(&storage, LAYOUT_KEY));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_or_default_unreadable() {
        let storage = MemoryStorage::new();
        block_on(storage.save(LAYOUT_KEY, &json!({"not": "a list"}))).unwrap();
        let store: ShapeStore = block_on(load_or_default(&storage, LAYOUT_KEY));
        assert!(store.is_empty());
        let strict: StorageResult<Option<ShapeStore>> = block_on(load_json(&storage, LAYOUT_KEY));
        assert!(matches!(strict, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_save_then_load_json() {
        let storage = MemoryStorage::new();
        block_on(save_json(&storage, "numbers", &vec![1, 2, 3])).unwrap();
        let loaded: Option<Vec<i32>> = block_on(load_json(&storage, "numbers")).unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }
}
