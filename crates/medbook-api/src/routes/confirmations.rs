//! Inbound bus adapter for delivery confirmations.
//!
//! The outbound notifier calls back here once the appointment email has
//! gone out; the payload is correlated to the appointment by its identifier.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use medbook_projection::consumer::{EmailConfirmation, handle_email_confirmation};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/v1/confirmations/email
async fn email_sent(
    State(state): State<AppState>,
    Json(confirmation): Json<EmailConfirmation>,
) -> Result<StatusCode, ApiError> {
    handle_email_confirmation(&confirmation, state.clock.as_ref(), state.event_store.as_ref())
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// Returns the router for confirmation callbacks.
pub fn router() -> Router<AppState> {
    Router::new().route("/email", post(email_sent))
}
