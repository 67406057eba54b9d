//! Domain events for the identity context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medbook_core::store::NewEvent;

/// Emitted when a user's role changes. Carries both the prior and the new
/// state, so one event is a complete audit record of the transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoleChanged {
    /// The user whose role changed.
    pub user_id: Uuid,
    /// The user's name at the time of the change.
    pub username: String,
    /// The user's email at the time of the change.
    pub email: String,
    /// Role before the change.
    pub old_role: String,
    /// Role after the change.
    pub new_role: String,
}

/// Event type identifier for [`UserRoleChanged`].
pub const USER_ROLE_CHANGED_EVENT_TYPE: &str = "user.role_changed";

/// Event payload variants for the identity context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UserEventKind {
    /// A user's role has changed.
    UserRoleChanged(UserRoleChanged),
}

impl UserEventKind {
    /// Returns the event type name (used for serialization routing).
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserRoleChanged(_) => USER_ROLE_CHANGED_EVENT_TYPE,
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
                .expect("UserEventKind serialization is infallible"),
            correlation_id,
            causation_id,
            occurred_at,
        }
    }
}
