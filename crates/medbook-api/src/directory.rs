//! Patient directory adapter over the users context.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use medbook_appointments::application::patients::{Patient, PatientDirectory};
use medbook_cache::CacheAside;
use medbook_core::error::DomainError;
use medbook_users::application::get_user::get_user;
use medbook_users::application::repository::UserRepository;

/// Resolves patients through the identity context's cache-aside lookup.
#[derive(Clone)]
pub struct CachedPatientDirectory {
    cache: CacheAside,
    users: Arc<dyn UserRepository>,
}

impl CachedPatientDirectory {
    /// Creates a new directory adapter.
    #[must_use]
    pub fn new(cache: CacheAside, users: Arc<dyn UserRepository>) -> Self {
        Self { cache, users }
    }
}

#[async_trait]
impl PatientDirectory for CachedPatientDirectory {
    async fn patient_by_id(&self, id: Uuid) -> Result<Patient, DomainError> {
        let view = get_user(id, &self.cache, self.users.as_ref()).await?;
        Ok(Patient {
            id: view.id,
            email: view.email,
            role: view.role,
        })
    }
}
