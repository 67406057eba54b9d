//! Event store abstractions.
//!
//! Events live in named, append-only streams. Within a stream, sequence
//! numbers are contiguous starting at 1 and appends are guarded by an
//! [`ExpectedRevision`]. Across streams the store maintains a single total
//! order (`global_position`) used only for projector catch-up reads; no
//! cross-stream ordering is promised to writers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of an event stream.
///
/// Streams are named `category:...`, one stream per logical entity, so
/// optimistic-concurrency retries stay scoped to the entity that needs them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamId(String);

/// Category prefix for appointment streams.
pub const APPOINTMENTS_CATEGORY: &str = "appointments";

/// Category prefix for user audit streams.
pub const USER_UPDATES_CATEGORY: &str = "user-updates";

/// Name of the email audit stream.
pub const EMAILS_STREAM: &str = "emails";

impl StreamId {
    /// Creates a stream id from a raw name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Stream holding all appointments for one doctor at one facility.
    #[must_use]
    pub fn appointments(facility_name: &str, doctor_id: Uuid) -> Self {
        Self(format!("{APPOINTMENTS_CATEGORY}:{facility_name}:{doctor_id}"))
    }

    /// Audit stream of role changes for one user.
    #[must_use]
    pub fn user_updates(user_id: Uuid) -> Self {
        Self(format!("{USER_UPDATES_CATEGORY}:{user_id}"))
    }

    /// The shared email-confirmation audit stream.
    #[must_use]
    pub fn emails() -> Self {
        Self(EMAILS_STREAM.to_owned())
    }

    /// The category prefix (everything before the first `:`).
    #[must_use]
    pub fn category(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }

    /// The raw stream name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The revision a writer expects a stream to be at before its append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedRevision {
    /// Skip the concurrency check (append-only audit streams).
    Any,
    /// The stream must not exist yet.
    NoStream,
    /// The stream's last sequence number must be exactly this value.
    Exact(i64),
}

/// An event that has not been appended yet.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Globally unique event identifier.
    pub event_id: Uuid,
    /// Event type name for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Causation ID linking this event to the command/event that caused it.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// An event as recorded in the store. Immutable once appended.
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    /// Position in the store-wide total order.
    pub global_position: i64,
    /// The stream this event belongs to.
    pub stream_id: StreamId,
    /// Sequence number within the stream, contiguous from 1.
    pub sequence_number: i64,
    /// Globally unique event identifier.
    pub event_id: Uuid,
    /// Event type name for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Causation ID linking to the causing command/event.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Result of a successful append.
#[derive(Debug, Clone, Copy)]
pub struct AppendResult {
    /// The stream's revision after the append (last sequence number).
    pub next_revision: i64,
    /// Global position of the last event appended.
    pub last_global_position: i64,
}

/// Append-only, per-stream-keyed event log with optimistic concurrency.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends `events` to `stream_id` atomically: either all land with
    /// contiguous sequence numbers or none do.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ConcurrencyConflict`] when `expected` names a
    /// concrete revision that does not match the stream, and
    /// [`DomainError::TransientIo`] when the store is unreachable.
    async fn append(
        &self,
        stream_id: &StreamId,
        expected: ExpectedRevision,
        events: Vec<NewEvent>,
    ) -> Result<AppendResult, DomainError>;

    /// Reads one stream in ascending sequence order, starting strictly after
    /// `from_sequence` (pass 0 for the whole stream).
    async fn read_stream(
        &self,
        stream_id: &StreamId,
        from_sequence: i64,
    ) -> Result<Vec<RecordedEvent>, DomainError>;

    /// The stream's current revision, or `None` if it has no events.
    async fn current_revision(&self, stream_id: &StreamId) -> Result<Option<i64>, DomainError>;

    /// Reads up to `limit` events across every stream in `category`, ordered
    /// by global position, strictly after `after_global_position`. This is
    /// the projector's catch-up feed.
    async fn read_category(
        &self,
        category: &str,
        after_global_position: i64,
        limit: i64,
    ) -> Result<Vec<RecordedEvent>, DomainError>;
}
