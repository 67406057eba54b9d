//! Read-through cache-aside layer.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use medbook_core::cache::CacheStore;
use medbook_core::error::DomainError;

/// Read-through cache over a shared key-value store.
///
/// Every code path that durably mutates the entity behind a key must call
/// [`CacheAside::invalidate`] *after* the mutation commits, never before —
/// invalidating first leaves a race window where a reader repopulates the
/// cache with pre-mutation data.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
}

impl CacheAside {
    /// Creates a new cache-aside layer over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Returns the cached value for `key`, or runs `loader`, stores the
    /// result with `ttl`, and returns it.
    ///
    /// Cache failures (unreachable store, undecodable entry) are treated as
    /// misses — the cache is derived state and recomputing is always safe.
    ///
    /// # Errors
    ///
    /// Returns whatever `loader` returns; cache errors never surface.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> Result<T, DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        match self.store.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    tracing::warn!(key, error = %err, "undecodable cache entry, treating as miss");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(key, error = %err, "cache read failed, treating as miss");
            }
        }

        let value = loader().await?;

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(err) = self.store.set(key, bytes, ttl).await {
                    tracing::warn!(key, error = %err, "cache write failed, returning loaded value");
                }
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "cache serialization failed, skipping store");
            }
        }

        Ok(value)
    }

    /// Removes `key` unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TransientIo`] when the cache is unreachable;
    /// callers log and move on — the entry expires by TTL regardless.
    pub async fn invalidate(&self, key: &str) -> Result<(), DomainError> {
        self.store.remove(key).await
    }
}
