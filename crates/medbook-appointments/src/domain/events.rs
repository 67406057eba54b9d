//! Domain events for the appointments context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medbook_core::store::NewEvent;

/// Emitted when an appointment has been booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreated {
    /// The appointment identifier.
    pub appointment_id: Uuid,
    /// The booking doctor.
    pub doctor_id: Uuid,
    /// The booking doctor's display name.
    pub doctor_name: String,
    /// The patient the appointment is for.
    pub patient_id: Uuid,
    /// The patient's verified email address.
    pub patient_email: String,
    /// Start of the 30-minute slot.
    pub start: DateTime<Utc>,
    /// The facility the appointment takes place at.
    pub facility_name: String,
    /// The calendar provider's booking reference.
    pub external_calendar_ref: String,
    /// Short summary shown on the calendar entry.
    pub summary: String,
    /// Free-form description.
    pub description: String,
}

/// Emitted when the outbound notifier confirms the appointment email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentEmailSent {
    /// The appointment the confirmation belongs to.
    pub appointment_id: Uuid,
}

/// Event type identifier for [`AppointmentCreated`].
pub const APPOINTMENT_CREATED_EVENT_TYPE: &str = "appointment.created";

/// Event type identifier for [`AppointmentEmailSent`].
pub const APPOINTMENT_EMAIL_SENT_EVENT_TYPE: &str = "appointment.email_sent";

/// Event payload variants for the appointments context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppointmentEventKind {
    /// An appointment has been booked.
    AppointmentCreated(AppointmentCreated),
    /// The confirmation email for an appointment has been sent.
    AppointmentEmailSent(AppointmentEmailSent),
}

impl AppointmentEventKind {
    /// Returns the event type name (used for serialization routing).
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AppointmentCreated(_) => APPOINTMENT_CREATED_EVENT_TYPE,
            Self::AppointmentEmailSent(_) => APPOINTMENT_EMAIL_SENT_EVENT_TYPE,
        }
    }

    /// The appointment this event is about.
    #[must_use]
    pub fn appointment_id(&self) -> Uuid {
        match self {
            Self::AppointmentCreated(e) => e.appointment_id,
            Self::AppointmentEmailSent(e) => e.appointment_id,
        }
    }

    /// Wraps this payload in a [`NewEvent`] ready for appending.
    #[must_use]
    pub fn into_new_event(
        self,
        occurred_at: DateTime<Utc>,
        correlation_id: Uuid,
        causation_id: Uuid,
    ) -> NewEvent {
        NewEvent {
            event_id: Uuid::new_v4(),
            event_type: self.event_type().to_owned(),
            // Serialization of derived Serialize types to Value is infallible.
            payload: serde_json::to_value(&self)
                .expect("AppointmentEventKind serialization is infallible"),
            correlation_id,
            causation_id,
            occurred_at,
        }
    }
}
