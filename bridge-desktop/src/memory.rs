//! Session-scoped storage held in process memory

use async_trait::async_trait;
use bridge_traits::{error::Result, storage::KeyValueStore};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory key-value store
///
/// The desktop counterpart of a browser's `sessionStorage`: values live as
/// long as the process and are gone on restart.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("auth.returnTo").await.unwrap(), None);

        store.set("auth.returnTo", "/edit/42").await.unwrap();
        assert_eq!(
            store.get("auth.returnTo").await.unwrap(),
            Some("/edit/42".to_string())
        );
        assert_eq!(store.keys().await.unwrap(), vec!["auth.returnTo"]);

        store.remove("auth.returnTo").await.unwrap();
        assert!(!store.contains("auth.returnTo").await.unwrap());
    }
}
