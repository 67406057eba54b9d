//! Patient identity lookup seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medbook_core::error::DomainError;

/// The slice of a user the appointments context needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// The patient's user id.
    pub id: Uuid,
    /// The patient's email address.
    pub email: String,
    /// The patient's role.
    pub role: String,
}

/// Identity lookup, consulted through the cache-aside layer by the boundary
/// adapter.
#[async_trait]
pub trait PatientDirectory: Send + Sync {
    /// Resolves a patient by user id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] when no such user exists.
    async fn patient_by_id(&self, id: Uuid) -> Result<Patient, DomainError>;
}
