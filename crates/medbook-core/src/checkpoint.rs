//! Checkpoint store abstraction.
//!
//! A checkpoint records how far a consumer has progressed through a stream or
//! category, as a global event-store position. It is the sole resumption
//! point for catch-up reads after a restart, which is why it may only be
//! advanced after the corresponding read-model writes have durably committed.

use async_trait::async_trait;

use crate::error::DomainError;

/// Durable mapping from stream name to last-processed global position.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Returns the last-processed position for `stream_name`, or 0 for a
    /// stream that has never been seen.
    async fn get(&self, stream_name: &str) -> Result<i64, DomainError>;

    /// Advances the checkpoint to `new_position`.
    ///
    /// Positions are monotonic: batch advances may jump forward, but a
    /// `new_position` lower than the stored one is a programmer error and
    /// must be rejected rather than silently skipping records.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ProjectionFault`] on a regression and
    /// [`DomainError::TransientIo`] when the backing store is unreachable.
    async fn advance(&self, stream_name: &str, new_position: i64) -> Result<(), DomainError>;
}
