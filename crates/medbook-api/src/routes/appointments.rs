//! Routes for the appointments bounded context.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medbook_appointments::application::read_model::AppointmentRow;
use medbook_appointments::application::{create, queries};
use medbook_appointments::domain::commands::CreateAppointment;

use crate::directory::CachedPatientDirectory;
use crate::error::ApiError;
use crate::extract::Actor;
use crate::state::AppState;

/// Request body for booking an appointment.
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    /// The facility the appointment takes place at.
    pub facility_name: String,
    /// The patient the appointment is for.
    pub patient_id: Uuid,
    /// Start of the 30-minute slot.
    pub start: DateTime<Utc>,
    /// Short summary shown on the calendar entry.
    pub summary: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Response body for an accepted booking.
#[derive(Debug, Serialize)]
pub struct AppointmentAcceptedResponse {
    /// The new appointment's identifier.
    pub appointment_id: Uuid,
    /// Always `accepted`: the booking is recorded but not yet visible in the
    /// read model.
    pub status: &'static str,
}

/// POST /api/v1/appointments
///
/// Returns 202 once the originating event is durably appended; the caller
/// must not assume the read model reflects the booking yet.
async fn create_appointment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Response, ApiError> {
    if !actor.belongs_to(&request.facility_name) {
        return Err(ApiError::forbidden(format!(
            "actor does not belong to facility {}",
            request.facility_name
        )));
    }

    let command = CreateAppointment {
        correlation_id: Uuid::new_v4(),
        facility_name: request.facility_name,
        doctor_id: actor.id,
        doctor_name: actor.name,
        patient_id: request.patient_id,
        start: request.start,
        summary: request.summary,
        description: request.description,
    };
    let directory = CachedPatientDirectory::new(state.cache.clone(), state.users.clone());

    let accepted = create::create_appointment(
        &command,
        state.clock.as_ref(),
        state.event_store.as_ref(),
        state.calendar.as_ref(),
        &directory,
    )
    .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(AppointmentAcceptedResponse {
            appointment_id: accepted.appointment_id,
            status: "accepted",
        }),
    )
        .into_response())
}

/// Query parameters for listing appointments.
#[derive(Debug, Deserialize)]
pub struct ListAppointmentsQuery {
    /// The facility to list for.
    pub facility_name: String,
}

/// GET /api/v1/appointments?facility_name=...
async fn list_appointments(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<Vec<AppointmentRow>>, ApiError> {
    if !actor.belongs_to(&query.facility_name) {
        return Err(ApiError::forbidden(format!(
            "actor does not belong to facility {}",
            query.facility_name
        )));
    }

    let rows = queries::appointments_by_facility_and_doctor(
        &query.facility_name,
        actor.id,
        &state.cache,
        state.appointments.as_ref(),
    )
    .await?;
    Ok(Json(rows))
}

/// Returns the router for the appointments context.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_appointment).get(list_appointments))
}
