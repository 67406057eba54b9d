//! Routes for the identity bounded context.

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use medbook_users::application::get_user::{UserView, get_user};
use medbook_users::application::update_role::update_user_role;
use medbook_users::domain::commands::UpdateUserRole;

use crate::error::ApiError;
use crate::extract::Actor;
use crate::state::AppState;

/// GET /api/v1/users/{id}
async fn get_user_by_id(
    State(state): State<AppState>,
    Actor(_actor): Actor,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserView>, ApiError> {
    let view = get_user(user_id, &state.cache, state.users.as_ref()).await?;
    Ok(Json(view))
}

/// Request body for a role change.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// The new role.
    pub role: String,
}

/// PUT /api/v1/users/{id}/role
async fn update_role(
    State(state): State<AppState>,
    Actor(_actor): Actor,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserView>, ApiError> {
    let command = UpdateUserRole {
        correlation_id: Uuid::new_v4(),
        user_id,
        new_role: request.role,
    };

    let view = update_user_role(
        &command,
        state.clock.as_ref(),
        state.users.as_ref(),
        state.event_store.as_ref(),
        &state.cache,
    )
    .await?;
    Ok(Json(view))
}

/// Returns the router for the identity context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_user_by_id))
        .route("/{id}/role", put(update_role))
}
