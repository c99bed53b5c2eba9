//! Key-value store adapter contract
//!
//! The repository only needs three primitives: read a value, write a value,
//! and list every key. Adapters report an absent key as `Ok(None)` and keep
//! connection or timeout failures in [`StoreError`].

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::error::StoreError;

/// Minimal key-value persistence interface consumed by the repository.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Enumerate every stored key. Order is adapter-defined.
    async fn list_keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Wraps any adapter so each call is bounded by a fixed timeout.
pub struct TimedStore {
    inner: Arc<dyn KeyValueStore>,
    timeout: Duration,
}

impl TimedStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: std::future::Future<Output = Result<T, StoreError>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "Store call timed out");
                Err(StoreError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for TimedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.bounded("set", self.inner.set(key, value)).await
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        self.bounded("list_keys", self.inner.list_keys()).await
    }
}
