//! In-memory `UserRepository` shared by this crate's tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use medbook_core::error::DomainError;

use super::repository::{User, UserRepository};

pub(crate) struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
    pub(crate) reads: AtomicU32,
}

impl InMemoryUserRepository {
    pub(crate) fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            reads: AtomicU32::new(0),
        }
    }

    pub(crate) fn insert(&self, username: &str, email: &str, role: &str) -> User {
        self.insert_with_id(Uuid::new_v4(), username, email, role)
    }

    pub(crate) fn insert_with_id(
        &self,
        id: Uuid,
        username: &str,
        email: &str,
        role: &str,
    ) -> User {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let user = User {
            id,
            username: username.to_owned(),
            email: email.to_owned(),
            role: role.to_owned(),
            created_at: at,
            updated_at: at,
        };
        self.users.lock().unwrap().insert(id, user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<User>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn update_role(&self, user_id: Uuid, new_role: &str) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&user_id).ok_or(DomainError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })?;
        user.role = new_role.to_owned();
        Ok(user.clone())
    }
}
