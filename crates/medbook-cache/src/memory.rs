//! In-process TTL cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use medbook_core::cache::CacheStore;
use medbook_core::clock::Clock;
use medbook_core::error::DomainError;

struct Entry {
    value: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// In-process cache with per-entry TTL, suitable as the single-node stand-in
/// for the shared distributed cache. Expiry is evaluated against the injected
/// clock on read; expired entries are dropped lazily.
pub struct InMemoryCache {
    entries: DashMap<String, Entry>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let expired = match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) => {
                if entry.expires_at > self.clock.now() {
                    return Ok(Some(entry.value.clone()));
                }
                true
            }
        };
        if expired {
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), DomainError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| DomainError::TransientIo(format!("ttl out of range: {e}")))?;
        self.entries.insert(
            key.to_owned(),
            Entry {
                value,
                expires_at: self.clock.now() + ttl,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;

    /// A clock that can be moved forward by tests.
    struct SteppingClock(Mutex<DateTime<Utc>>);

    impl SteppingClock {
        fn new() -> Self {
            Self(Mutex::new(
                Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            ))
        }

        fn advance(&self, by: chrono::Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let cache = InMemoryCache::new(Arc::new(SteppingClock::new()));

        cache
            .set("user:1", b"alice".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("user:1").await.unwrap(), Some(b"alice".to_vec()));
    }

    #[tokio::test]
    async fn test_entries_expire_by_ttl() {
        let clock = Arc::new(SteppingClock::new());
        let cache = InMemoryCache::new(clock.clone());

        cache
            .set("user:1", b"alice".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(61));

        assert_eq!(cache.get("user:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_is_unconditional_and_idempotent() {
        let cache = InMemoryCache::new(Arc::new(SteppingClock::new()));

        cache
            .set("user:1", b"alice".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        cache.remove("user:1").await.unwrap();
        cache.remove("user:1").await.unwrap();

        assert_eq!(cache.get("user:1").await.unwrap(), None);
    }
}
