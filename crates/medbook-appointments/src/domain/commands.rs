//! Commands for the appointments context.

use chrono::{DateTime, Utc};
use medbook_core::command::Command;
use uuid::Uuid;

/// Command to book an appointment.
#[derive(Debug, Clone)]
pub struct CreateAppointment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The facility the appointment takes place at.
    pub facility_name: String,
    /// The booking doctor.
    pub doctor_id: Uuid,
    /// The booking doctor's display name.
    pub doctor_name: String,
    /// The patient the appointment is for.
    pub patient_id: Uuid,
    /// Start of the 30-minute slot.
    pub start: DateTime<Utc>,
    /// Short summary shown on the calendar entry.
    pub summary: String,
    /// Free-form description.
    pub description: String,
}

impl Command for CreateAppointment {
    fn command_type(&self) -> &'static str {
        "appointments.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
