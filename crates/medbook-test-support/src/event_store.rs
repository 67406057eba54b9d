//! In-memory `EventStore` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use medbook_core::error::DomainError;
use medbook_core::store::{
    AppendResult, EventStore, ExpectedRevision, NewEvent, RecordedEvent, StreamId,
};

/// An in-memory event store with the full append-only contract: contiguous
/// per-stream sequence numbers, optimistic concurrency, and a store-wide
/// global order for category reads.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: Mutex<Vec<RecordedEvent>>,
}

impl InMemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every event on `stream_id`, in sequence order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events_on(&self, stream_id: &StreamId) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.stream_id == stream_id)
            .cloned()
            .collect()
    }

    fn matches_category(stream_id: &StreamId, category: &str) -> bool {
        stream_id.as_str() == category
            || stream_id
                .as_str()
                .starts_with(&format!("{category}:"))
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(
        &self,
        stream_id: &StreamId,
        expected: ExpectedRevision,
        events: Vec<NewEvent>,
    ) -> Result<AppendResult, DomainError> {
        let mut log = self.events.lock().unwrap();

        let current = log
            .iter()
            .filter(|e| &e.stream_id == stream_id)
            .map(|e| e.sequence_number)
            .max();
        let current_revision = current.unwrap_or(0);

        match expected {
            ExpectedRevision::Any => {}
            ExpectedRevision::NoStream => {
                if current.is_some() {
                    return Err(DomainError::ConcurrencyConflict {
                        stream_id: stream_id.to_string(),
                        expected: 0,
                        actual: current_revision,
                    });
                }
            }
            ExpectedRevision::Exact(revision) => {
                if current_revision != revision {
                    return Err(DomainError::ConcurrencyConflict {
                        stream_id: stream_id.to_string(),
                        expected: revision,
                        actual: current_revision,
                    });
                }
            }
        }

        let mut sequence = current_revision;
        let mut last_global_position = 0;
        for event in events {
            sequence += 1;
            let global_position = i64::try_from(log.len()).unwrap() + 1;
            last_global_position = global_position;
            log.push(RecordedEvent {
                global_position,
                stream_id: stream_id.clone(),
                sequence_number: sequence,
                event_id: event.event_id,
                event_type: event.event_type,
                payload: event.payload,
                correlation_id: event.correlation_id,
                causation_id: event.causation_id,
                occurred_at: event.occurred_at,
            });
        }

        Ok(AppendResult {
            next_revision: sequence,
            last_global_position,
        })
    }

    async fn read_stream(
        &self,
        stream_id: &StreamId,
        from_sequence: i64,
    ) -> Result<Vec<RecordedEvent>, DomainError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.stream_id == stream_id && e.sequence_number > from_sequence)
            .cloned()
            .collect())
    }

    async fn current_revision(&self, stream_id: &StreamId) -> Result<Option<i64>, DomainError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.stream_id == stream_id)
            .map(|e| e.sequence_number)
            .max())
    }

    async fn read_category(
        &self,
        category: &str,
        after_global_position: i64,
        limit: i64,
    ) -> Result<Vec<RecordedEvent>, DomainError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                Self::matches_category(&e.stream_id, category)
                    && e.global_position > after_global_position
            })
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

/// An event store whose every operation fails with a transient error.
#[derive(Debug, Default)]
pub struct FailingEventStore;

#[async_trait]
impl EventStore for FailingEventStore {
    async fn append(
        &self,
        _stream_id: &StreamId,
        _expected: ExpectedRevision,
        _events: Vec<NewEvent>,
    ) -> Result<AppendResult, DomainError> {
        Err(DomainError::TransientIo("connection refused".into()))
    }

    async fn read_stream(
        &self,
        _stream_id: &StreamId,
        _from_sequence: i64,
    ) -> Result<Vec<RecordedEvent>, DomainError> {
        Err(DomainError::TransientIo("connection refused".into()))
    }

    async fn current_revision(&self, _stream_id: &StreamId) -> Result<Option<i64>, DomainError> {
        Err(DomainError::TransientIo("connection refused".into()))
    }

    async fn read_category(
        &self,
        _category: &str,
        _after_global_position: i64,
        _limit: i64,
    ) -> Result<Vec<RecordedEvent>, DomainError> {
        Err(DomainError::TransientIo("connection refused".into()))
    }
}
