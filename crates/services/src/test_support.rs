//! Storage fakes shared by unit tests.

use async_trait::async_trait;

use storage::repository::{InMemoryStore, KeyValueStore, StorageError};

/// In-memory store that rejects writes to the keys matched by `fails`.
/// Reads and removals always go through.
#[derive(Clone)]
pub struct FailingWrites {
    inner: InMemoryStore,
    fails: fn(&str) -> bool,
}

impl FailingWrites {
    pub fn all(inner: InMemoryStore) -> Self {
        Self {
            inner,
            fails: |_| true,
        }
    }

    pub fn matching(inner: InMemoryStore, fails: fn(&str) -> bool) -> Self {
        Self { inner, fails }
    }
}

#[async_trait]
impl KeyValueStore for FailingWrites {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if (self.fails)(key) {
            return Err(StorageError::Connection(format!("write rejected: {key}")));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}
