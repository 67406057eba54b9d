//! The create-appointment command orchestrator.
//!
//! Sequencing: business rules → availability oracle → patient identity →
//! append to the doctor's stream with the observed revision. The caller is
//! told the booking is *accepted*, not visible — the read-model row appears
//! only once the projector catches up.

use medbook_core::clock::Clock;
use medbook_core::error::DomainError;
use medbook_core::retry;
use medbook_core::rules::check;
use medbook_core::store::{EventStore, ExpectedRevision, StreamId};
use uuid::Uuid;

use crate::domain::commands::CreateAppointment;
use crate::domain::events::{AppointmentCreated, AppointmentEventKind};
use crate::domain::rules::{DoctorProvided, FacilityProvided, PatientEmailValid, StartsInFuture};

use super::calendar::{CalendarOracle, SlotAvailability};
use super::patients::PatientDirectory;

/// How many times a lost optimistic-concurrency race is retried before the
/// conflict is surfaced to the caller.
pub const MAX_CONFLICT_RETRIES: u32 = 3;

/// Result of an accepted booking. The appointment is durably recorded but not
/// yet visible in the read model.
#[derive(Debug)]
pub struct AppointmentAccepted {
    /// The new appointment's identifier.
    pub appointment_id: Uuid,
    /// The stream the originating event landed on.
    pub stream_id: StreamId,
}

fn validate(command: &CreateAppointment, now: chrono::DateTime<chrono::Utc>) -> Result<(), DomainError> {
    let starts_in_future = StartsInFuture {
        start: command.start,
        now,
    };
    let facility = FacilityProvided {
        facility_name: &command.facility_name,
    };
    let doctor = DoctorProvided {
        doctor_name: &command.doctor_name,
    };
    check(&[&starts_in_future, &facility, &doctor])
}

/// Executes one create-appointment transaction.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when a business rule rejects the
/// command, [`DomainError::SlotUnavailable`] when the oracle reports the slot
/// taken or cannot be reached, [`DomainError::NotFound`] when the patient
/// does not exist, and [`DomainError::ConcurrencyConflict`] when the append
/// race is lost [`MAX_CONFLICT_RETRIES`] times.
pub async fn create_appointment(
    command: &CreateAppointment,
    clock: &dyn Clock,
    store: &dyn EventStore,
    calendar: &dyn CalendarOracle,
    patients: &dyn PatientDirectory,
) -> Result<AppointmentAccepted, DomainError> {
    validate(command, clock.now())?;

    // Any oracle failure is a hard rejection: silently retrying could cross
    // the 30-minute slot boundary and double-book.
    let calendar_ref = match calendar.check_slot(command.start).await {
        Ok(SlotAvailability::Available { calendar_ref }) => calendar_ref,
        Ok(SlotAvailability::Unavailable) => return Err(DomainError::SlotUnavailable),
        Err(err) => {
            tracing::warn!(
                correlation_id = %command.correlation_id,
                error = %err,
                "availability oracle failed, rejecting slot"
            );
            return Err(DomainError::SlotUnavailable);
        }
    };

    let patient = patients.patient_by_id(command.patient_id).await?;
    let email_valid = PatientEmailValid {
        email: &patient.email,
    };
    check(&[&email_valid])?;

    let stream_id = StreamId::appointments(&command.facility_name, command.doctor_id);
    let appointment_id = Uuid::new_v4();

    let mut attempt = 0;
    loop {
        // A retry after a lost race must not reuse stale assumptions: fresh
        // clock reading for the rules, fresh revision for the append.
        validate(command, clock.now())?;
        let expected = match store.current_revision(&stream_id).await? {
            None => ExpectedRevision::NoStream,
            Some(revision) => ExpectedRevision::Exact(revision),
        };

        let event = AppointmentEventKind::AppointmentCreated(AppointmentCreated {
            appointment_id,
            doctor_id: command.doctor_id,
            doctor_name: command.doctor_name.clone(),
            patient_id: command.patient_id,
            patient_email: patient.email.clone(),
            start: command.start,
            facility_name: command.facility_name.clone(),
            external_calendar_ref: calendar_ref.clone(),
            summary: command.summary.clone(),
            description: command.description.clone(),
        })
        .into_new_event(clock.now(), command.correlation_id, command.correlation_id);

        let appended = retry::with_backoff("append appointment.created", || {
            store.append(&stream_id, expected, vec![event.clone()])
        })
        .await;

        match appended {
            Ok(result) => {
                tracing::info!(
                    correlation_id = %command.correlation_id,
                    stream_id = %stream_id,
                    appointment_id = %appointment_id,
                    revision = result.next_revision,
                    "appointment accepted"
                );
                return Ok(AppointmentAccepted {
                    appointment_id,
                    stream_id,
                });
            }
            Err(DomainError::ConcurrencyConflict { .. }) if attempt + 1 < MAX_CONFLICT_RETRIES => {
                attempt += 1;
                tracing::debug!(
                    correlation_id = %command.correlation_id,
                    stream_id = %stream_id,
                    attempt,
                    "lost append race, retrying with fresh revision"
                );
            }
            Err(err) => return Err(err),
        }
    }
}
