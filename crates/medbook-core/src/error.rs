//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Each variant carries distinct retry semantics: validation failures and
/// missing entities are reported and never retried, concurrency conflicts are
/// retried a bounded number of times by the caller that lost the race,
/// transient I/O failures are retried with backoff at the call site that owns
/// durability, and projection faults halt the affected consumer.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A named business rule rejected the command.
    #[error("validation failed ({rule}): {message}")]
    Validation {
        /// The rule that failed.
        rule: &'static str,
        /// Human-readable failure message.
        message: String,
    },

    /// Optimistic concurrency conflict on an event stream.
    #[error("concurrency conflict on stream {stream_id}: expected revision {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The stream that had the conflict.
        stream_id: String,
        /// The revision the writer expected.
        expected: i64,
        /// The revision actually found.
        actual: i64,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// The requested appointment slot is not available.
    #[error("appointment slot is not available")]
    SlotUnavailable,

    /// A store or cache was temporarily unreachable.
    #[error("transient i/o failure: {0}")]
    TransientIo(String),

    /// A read-model apply failed irrecoverably; the consumer must halt
    /// without advancing its checkpoint.
    #[error("projection fault: {0}")]
    ProjectionFault(String),
}

impl DomainError {
    /// Whether this error is safe to retry at the call site that owns
    /// durability.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientIo(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_io_is_retryable() {
        assert!(DomainError::TransientIo("timeout".into()).is_transient());
        assert!(
            !DomainError::Validation {
                rule: "starts_in_future",
                message: "in the past".into(),
            }
            .is_transient()
        );
        assert!(!DomainError::SlotUnavailable.is_transient());
        assert!(!DomainError::ProjectionFault("bad payload".into()).is_transient());
    }

    #[test]
    fn test_conflict_message_names_stream_and_revisions() {
        let err = DomainError::ConcurrencyConflict {
            stream_id: "appointments:northside:d1".into(),
            expected: 3,
            actual: 4,
        };
        let message = err.to_string();
        assert!(message.contains("appointments:northside:d1"));
        assert!(message.contains("expected revision 3"));
        assert!(message.contains("found 4"));
    }
}
