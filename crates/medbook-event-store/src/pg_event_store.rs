//! `PostgreSQL` implementation of the `EventStore` trait.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use medbook_core::error::DomainError;
use medbook_core::store::{
    AppendResult, EventStore, ExpectedRevision, NewEvent, RecordedEvent, StreamId,
};

/// PostgreSQL-backed event store.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Creates a new `PgEventStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn transient(err: sqlx::Error) -> DomainError {
    DomainError::TransientIo(err.to_string())
}

/// A unique violation on `(stream_id, sequence_number)` means another writer
/// landed first; anything else is a transient store failure.
fn insert_error(err: sqlx::Error, stream_id: &StreamId, expected: i64, actual: i64) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DomainError::ConcurrencyConflict {
                stream_id: stream_id.to_string(),
                expected,
                actual,
            };
        }
    }
    transient(err)
}

fn row_to_recorded(row: &PgRow) -> Result<RecordedEvent, sqlx::Error> {
    Ok(RecordedEvent {
        global_position: row.try_get("global_position")?,
        stream_id: StreamId::new(row.try_get::<String, _>("stream_id")?),
        sequence_number: row.try_get("sequence_number")?,
        event_id: row.try_get("event_id")?,
        event_type: row.try_get("event_type")?,
        payload: row.try_get("payload")?,
        correlation_id: row.try_get("correlation_id")?,
        causation_id: row.try_get("causation_id")?,
        occurred_at: row.try_get("occurred_at")?,
    })
}

const SELECT_COLUMNS: &str = "global_position, stream_id, sequence_number, event_id, \
     event_type, payload, correlation_id, causation_id, occurred_at";

#[async_trait]
impl EventStore for PgEventStore {
    async fn append(
        &self,
        stream_id: &StreamId,
        expected: ExpectedRevision,
        events: Vec<NewEvent>,
    ) -> Result<AppendResult, DomainError> {
        let mut tx = self.pool.begin().await.map_err(transient)?;

        // Lock the stream head so concurrent appenders serialize here; the
        // unique (stream_id, sequence_number) constraint backstops the case
        // where both writers see an empty stream and there is no row to lock.
        let head: Option<i64> = sqlx::query_scalar(
            "SELECT sequence_number FROM domain_events \
             WHERE stream_id = $1 \
             ORDER BY sequence_number DESC LIMIT 1 \
             FOR UPDATE",
        )
        .bind(stream_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(transient)?;

        let current = head.unwrap_or(0);
        match expected {
            ExpectedRevision::Any => {}
            ExpectedRevision::NoStream => {
                if head.is_some() {
                    return Err(DomainError::ConcurrencyConflict {
                        stream_id: stream_id.to_string(),
                        expected: 0,
                        actual: current,
                    });
                }
            }
            ExpectedRevision::Exact(revision) => {
                if current != revision {
                    return Err(DomainError::ConcurrencyConflict {
                        stream_id: stream_id.to_string(),
                        expected: revision,
                        actual: current,
                    });
                }
            }
        }

        let mut sequence = current;
        let mut last_global_position = 0;
        for event in events {
            sequence += 1;
            last_global_position = sqlx::query_scalar(
                "INSERT INTO domain_events \
                 (event_id, stream_id, event_type, payload, sequence_number, \
                  correlation_id, causation_id, occurred_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 RETURNING global_position",
            )
            .bind(event.event_id)
            .bind(stream_id.as_str())
            .bind(&event.event_type)
            .bind(&event.payload)
            .bind(sequence)
            .bind(event.correlation_id)
            .bind(event.causation_id)
            .bind(event.occurred_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| insert_error(e, stream_id, current, sequence))?;
        }

        tx.commit().await.map_err(transient)?;

        tracing::debug!(
            stream_id = %stream_id,
            next_revision = sequence,
            last_global_position,
            "events appended"
        );

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
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM domain_events \
             WHERE stream_id = $1 AND sequence_number > $2 \
             ORDER BY sequence_number ASC"
        ))
        .bind(stream_id.as_str())
        .bind(from_sequence)
        .fetch_all(&self.pool)
        .await
        .map_err(transient)?;

        rows.iter()
            .map(|row| row_to_recorded(row).map_err(transient))
            .collect()
    }

    async fn current_revision(&self, stream_id: &StreamId) -> Result<Option<i64>, DomainError> {
        sqlx::query_scalar(
            "SELECT sequence_number FROM domain_events \
             WHERE stream_id = $1 \
             ORDER BY sequence_number DESC LIMIT 1",
        )
        .bind(stream_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(transient)
    }

    async fn read_category(
        &self,
        category: &str,
        after_global_position: i64,
        limit: i64,
    ) -> Result<Vec<RecordedEvent>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM domain_events \
             WHERE (stream_id = $1 OR stream_id LIKE $1 || ':%') \
               AND global_position > $2 \
             ORDER BY global_position ASC \
             LIMIT $3"
        ))
        .bind(category)
        .bind(after_global_position)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(transient)?;

        rows.iter()
            .map(|row| row_to_recorded(row).map_err(transient))
            .collect()
    }
}
