//! Key-value cache abstraction.
//!
//! The cache holds opaque serialized snapshots with explicit TTLs. It is
//! strictly derived state: it may be dropped and rebuilt at any time, so
//! every operation failure is safe to treat as a miss.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DomainError;

/// Shared key-value cache with per-entry TTL.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the cached bytes for `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError>;

    /// Stores `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), DomainError>;

    /// Removes `key` unconditionally. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}
