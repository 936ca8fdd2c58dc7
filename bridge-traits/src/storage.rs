//! Key-Value Storage Abstraction
//!
//! The session core persists two kinds of small string values:
//! - durable entries that survive restarts (credential records)
//! - session-scoped entries that live until the host session ends
//!   (the pending return-to path)
//!
//! Both are expressed through the same [`KeyValueStore`] trait; the host
//! decides the backing medium by injecting different implementations.
//! Platform mapping:
//! - Web: `localStorage` / `sessionStorage`
//! - Desktop: SQLite file / process memory
//! - Mobile: SharedPreferences / UserDefaults

use async_trait::async_trait;

use crate::error::Result;

/// String key-value storage trait
///
/// Implementations are shared across tasks and must be `Send + Sync`.
/// Writes are last-write-wins; no transactional guarantees are required.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStore;
///
/// async fn remember(store: &dyn KeyValueStore, path: &str) -> Result<()> {
///     store.set("auth.returnTo", path).await
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check whether a key exists
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// List all stored keys
    async fn keys(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        Store {}

        #[async_trait]
        impl KeyValueStore for Store {
            async fn get(&self, key: &str) -> Result<Option<String>>;
            async fn set(&self, key: &str, value: &str) -> Result<()>;
            async fn remove(&self, key: &str) -> Result<()>;
            async fn keys(&self) -> Result<Vec<String>>;
        }
    }

    #[tokio::test]
    async fn test_contains_defaults_to_get() {
        let mut store = MockStore::new();
        store.expect_get().times(2).returning(|key| {
            if key == "present" {
                Ok(Some("value".to_string()))
            } else {
                Ok(None)
            }
        });

        assert!(store.contains("present").await.unwrap());
        assert!(!store.contains("absent").await.unwrap());
    }
}
