//! `PostgreSQL` implementation of the `UserRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use medbook_core::error::DomainError;

use crate::application::repository::{User, UserRepository};

/// PostgreSQL-backed user repository.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a new `PgUserRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn transient(err: sqlx::Error) -> DomainError {
    DomainError::TransientIo(err.to_string())
}

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    email: String,
    role: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            role: record.role,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, role, created_at, updated_at";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<User>, DomainError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(transient)?;

        Ok(record.map(User::from))
    }

    async fn update_role(&self, user_id: Uuid, new_role: &str) -> Result<User, DomainError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET role = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(new_role)
        .fetch_optional(&self.pool)
        .await
        .map_err(transient)?;

        record.map(User::from).ok_or(DomainError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })
    }
}
