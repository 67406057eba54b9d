//! Deterministic cache key functions.

use uuid::Uuid;

/// Key for the appointment list of one doctor at one facility.
#[must_use]
pub fn appointments_by_doctor_and_facility(facility_name: &str, doctor_id: Uuid) -> String {
    format!("appointments:{facility_name}:{doctor_id}")
}

/// Key for a single user snapshot.
#[must_use]
pub fn user_by_id(id: Uuid) -> String {
    format!("user:{id}")
}
