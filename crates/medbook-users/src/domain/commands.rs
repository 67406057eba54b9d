//! Commands for the identity context.

use medbook_core::command::Command;
use uuid::Uuid;

/// Command to change a user's role.
#[derive(Debug, Clone)]
pub struct UpdateUserRole {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user whose role to change.
    pub user_id: Uuid,
    /// The new role.
    pub new_role: String,
}

impl Command for UpdateUserRole {
    fn command_type(&self) -> &'static str {
        "users.update_role"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
