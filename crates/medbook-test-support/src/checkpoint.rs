//! In-memory `CheckpointStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use medbook_core::checkpoint::CheckpointStore;
use medbook_core::error::DomainError;

/// An in-memory checkpoint store with the monotonic-advance contract.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    positions: Mutex<HashMap<String, i64>>,
}

impl InMemoryCheckpointStore {
    /// Creates an empty checkpoint store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn get(&self, stream_name: &str) -> Result<i64, DomainError> {
        Ok(self
            .positions
            .lock()
            .unwrap()
            .get(stream_name)
            .copied()
            .unwrap_or(0))
    }

    async fn advance(&self, stream_name: &str, new_position: i64) -> Result<(), DomainError> {
        let mut positions = self.positions.lock().unwrap();
        let current = positions.get(stream_name).copied().unwrap_or(0);
        if new_position < current {
            return Err(DomainError::ProjectionFault(format!(
                "checkpoint regression on {stream_name}: {current} -> {new_position}"
            )));
        }
        positions.insert(stream_name.to_owned(), new_position);
        Ok(())
    }
}

/// A checkpoint store whose every operation fails with a transient error.
#[derive(Debug, Default)]
pub struct FailingCheckpointStore;

#[async_trait]
impl CheckpointStore for FailingCheckpointStore {
    async fn get(&self, _stream_name: &str) -> Result<i64, DomainError> {
        Err(DomainError::TransientIo("connection refused".into()))
    }

    async fn advance(&self, _stream_name: &str, _new_position: i64) -> Result<(), DomainError> {
        Err(DomainError::TransientIo("connection refused".into()))
    }
}
