//! `PostgreSQL` implementation of the `CheckpointStore` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use medbook_core::checkpoint::CheckpointStore;
use medbook_core::error::DomainError;

/// PostgreSQL-backed checkpoint store, one row per projected stream.
#[derive(Debug, Clone)]
pub struct PgCheckpointStore {
    pool: PgPool,
}

impl PgCheckpointStore {
    /// Creates a new `PgCheckpointStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn transient(err: sqlx::Error) -> DomainError {
    DomainError::TransientIo(err.to_string())
}

#[async_trait]
impl CheckpointStore for PgCheckpointStore {
    async fn get(&self, stream_name: &str) -> Result<i64, DomainError> {
        let position: Option<i64> =
            sqlx::query_scalar("SELECT position FROM event_store_checkpoints WHERE stream_name = $1")
                .bind(stream_name)
                .fetch_optional(&self.pool)
                .await
                .map_err(transient)?;
        Ok(position.unwrap_or(0))
    }

    async fn advance(&self, stream_name: &str, new_position: i64) -> Result<(), DomainError> {
        // The conditional upsert refuses to move backwards; a regression
        // means a programming error upstream and must surface, not silently
        // skip records.
        let updated: Option<i64> = sqlx::query_scalar(
            "INSERT INTO event_store_checkpoints (stream_name, position, updated_at) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (stream_name) DO UPDATE \
             SET position = EXCLUDED.position, updated_at = NOW() \
             WHERE event_store_checkpoints.position <= EXCLUDED.position \
             RETURNING position",
        )
        .bind(stream_name)
        .bind(new_position)
        .fetch_optional(&self.pool)
        .await
        .map_err(transient)?;

        if updated.is_none() {
            return Err(DomainError::ProjectionFault(format!(
                "checkpoint regression on {stream_name}: refusing to move back to {new_position}"
            )));
        }
        Ok(())
    }
}
