//! Inbound confirmation consumer.
//!
//! The outbound notifier eventually reports delivery of the appointment
//! email; the confirmation arrives back over the bus keyed by the original
//! appointment identifier, and gets recorded on the shared `emails` audit
//! stream. The stream is an append-only log with no cross-writer consistency
//! requirement, so the append skips the concurrency check.

use serde::Deserialize;
use uuid::Uuid;

use medbook_appointments::domain::events::{AppointmentEmailSent, AppointmentEventKind};
use medbook_core::clock::Clock;
use medbook_core::error::DomainError;
use medbook_core::retry;
use medbook_core::store::{EventStore, ExpectedRevision, StreamId};

/// A delivery confirmation from the notification bus, correlated to the
/// appointment by its identifier rather than by position.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfirmation {
    /// The appointment whose email was delivered.
    pub appointment_id: Uuid,
}

/// Records an email confirmation on the audit stream.
///
/// Deliveries are at-least-once; duplicates simply land as additional audit
/// entries, which is acceptable for an append-only log.
///
/// # Errors
///
/// Returns [`DomainError::TransientIo`] when the store stays unreachable
/// after retries.
pub async fn handle_email_confirmation(
    confirmation: &EmailConfirmation,
    clock: &dyn Clock,
    store: &dyn EventStore,
) -> Result<(), DomainError> {
    let event = AppointmentEventKind::AppointmentEmailSent(AppointmentEmailSent {
        appointment_id: confirmation.appointment_id,
    })
    .into_new_event(
        clock.now(),
        confirmation.appointment_id,
        confirmation.appointment_id,
    );

    let stream_id = StreamId::emails();
    retry::with_backoff("append appointment.email_sent", || {
        store.append(&stream_id, ExpectedRevision::Any, vec![event.clone()])
    })
    .await?;

    tracing::info!(
        appointment_id = %confirmation.appointment_id,
        "email confirmation recorded"
    );
    Ok(())
}
