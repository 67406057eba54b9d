//! User repository abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use medbook_core::error::DomainError;

/// A stored user.
#[derive(Debug, Clone)]
pub struct User {
    /// The user's id.
    pub id: Uuid,
    /// Display name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Current role.
    pub role: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Repository for the users table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Loads a user by id, or `None` if absent.
    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<User>, DomainError>;

    /// Persists a new role for `user_id` and returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] when no such user exists.
    async fn update_role(&self, user_id: Uuid, new_role: &str) -> Result<User, DomainError>;
}
