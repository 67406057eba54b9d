//! Route modules and the composed application router.

use axum::Router;

use crate::state::AppState;

pub mod appointments;
pub mod confirmations;
pub mod health;
pub mod users;

/// Builds the full application router over `state`.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/appointments", appointments::router())
        .nest("/api/v1/users", users::router())
        .nest("/api/v1/confirmations", confirmations::router())
        .with_state(state)
}
