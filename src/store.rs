use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::StoreError;

/// Durable key-value medium holding serialized records.
pub trait KeyValueStore {
    /// Returns `None` when nothing has been saved under `key` yet.
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn save(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once the total stored bytes would exceed `bytes`.
    pub fn with_capacity(bytes: usize) -> Self {
        let store = Self::default();
        store.lock().capacity = Some(bytes);
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.lock().values.insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if let Some(capacity) = inner.capacity {
            let others: usize = inner
                .values
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();
            if others + key.len() + value.len() > capacity {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        inner.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_keys_load_as_none() {
        let store = MemoryStore::new();
        assert!(store.load("students").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saves_overwrite_previous_value() {
        let store = MemoryStore::new();
        store.save("k", "one").await.unwrap();
        store.save("k", "two").await.unwrap();
        assert_eq!(store.load("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn writes_past_capacity_are_rejected() {
        let store = MemoryStore::with_capacity(8);
        store.save("k", "1234").await.unwrap();
        let err = store.save("k", "123456789").await.unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(store.get("k").as_deref(), Some("1234"));
    }
}
