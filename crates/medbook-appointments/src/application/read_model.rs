//! Appointment read model seam.
//!
//! Rows are created only by the projector, never by the orchestrator: the
//! read model is a derived, eventually-consistent projection of the stream.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medbook_core::error::DomainError;

/// One projected appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRow {
    /// The appointment identifier (the event's own identity).
    pub id: Uuid,
    /// The booking doctor.
    pub doctor_id: Uuid,
    /// The patient the appointment is for.
    pub patient_id: Uuid,
    /// Start of the 30-minute slot.
    pub start: DateTime<Utc>,
    /// The facility the appointment takes place at.
    pub facility_name: String,
    /// The calendar provider's booking reference.
    pub external_calendar_ref: String,
    /// When the originating event occurred.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

/// Projected appointment state.
#[async_trait]
pub trait AppointmentReadModel: Send + Sync {
    /// Writes `row`, keyed by `row.id`. Must be idempotent: re-applying the
    /// same event is a no-op with respect to final state.
    async fn upsert(&self, row: &AppointmentRow) -> Result<(), DomainError>;

    /// Lists the projected appointments for one doctor at one facility.
    async fn list_by_facility_and_doctor(
        &self,
        facility_name: &str,
        doctor_id: Uuid,
    ) -> Result<Vec<AppointmentRow>, DomainError>;
}
