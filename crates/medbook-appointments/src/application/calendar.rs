//! Availability oracle seam.
//!
//! The calendar provider is an external collaborator; the core only asks
//! whether a slot is free. A free slot comes back with the provider's booking
//! reference, which ends up on the appointment read model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use medbook_core::error::DomainError;

/// The oracle's verdict on one 30-minute slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotAvailability {
    /// The slot is free; `calendar_ref` is the provider's booking reference.
    Available {
        /// Provider-side reference for the reserved slot.
        calendar_ref: String,
    },
    /// The slot is taken.
    Unavailable,
}

/// Black-box availability oracle for appointment slots.
#[async_trait]
pub trait CalendarOracle: Send + Sync {
    /// Checks the 30-minute slot beginning at `start`.
    ///
    /// # Errors
    ///
    /// Implementations surface provider failures as
    /// [`DomainError::TransientIo`]; the orchestrator treats any failure as a
    /// hard rejection rather than silently retrying across a slot boundary.
    async fn check_slot(&self, start: DateTime<Utc>) -> Result<SlotAvailability, DomainError>;
}
