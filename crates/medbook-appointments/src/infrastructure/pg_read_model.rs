//! `PostgreSQL` implementation of the appointment read model.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use medbook_core::error::DomainError;

use crate::application::read_model::{AppointmentReadModel, AppointmentRow};

/// PostgreSQL-backed appointment read model.
#[derive(Debug, Clone)]
pub struct PgAppointmentReadModel {
    pool: PgPool,
}

impl PgAppointmentReadModel {
    /// Creates a new `PgAppointmentReadModel`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn transient(err: sqlx::Error) -> DomainError {
    DomainError::TransientIo(err.to_string())
}

#[derive(sqlx::FromRow)]
struct AppointmentRecord {
    id: Uuid,
    doctor_id: Uuid,
    patient_id: Uuid,
    start_time: chrono::DateTime<chrono::Utc>,
    facility_name: String,
    external_calendar_ref: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<AppointmentRecord> for AppointmentRow {
    fn from(record: AppointmentRecord) -> Self {
        Self {
            id: record.id,
            doctor_id: record.doctor_id,
            patient_id: record.patient_id,
            start: record.start_time,
            facility_name: record.facility_name,
            external_calendar_ref: record.external_calendar_ref,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[async_trait]
impl AppointmentReadModel for PgAppointmentReadModel {
    async fn upsert(&self, row: &AppointmentRow) -> Result<(), DomainError> {
        // Keyed by the event's own appointment id: re-applying the same
        // event hits the conflict arm and changes nothing.
        sqlx::query(
            "INSERT INTO appointments \
             (id, doctor_id, patient_id, start_time, facility_name, \
              external_calendar_ref, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(row.id)
        .bind(row.doctor_id)
        .bind(row.patient_id)
        .bind(row.start)
        .bind(&row.facility_name)
        .bind(&row.external_calendar_ref)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(transient)?;
        Ok(())
    }

    async fn list_by_facility_and_doctor(
        &self,
        facility_name: &str,
        doctor_id: Uuid,
    ) -> Result<Vec<AppointmentRow>, DomainError> {
        let records = sqlx::query_as::<_, AppointmentRecord>(
            "SELECT id, doctor_id, patient_id, start_time, facility_name, \
                    external_calendar_ref, created_at, updated_at \
             FROM appointments \
             WHERE facility_name = $1 AND doctor_id = $2 \
             ORDER BY start_time ASC",
        )
        .bind(facility_name)
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(transient)?;

        Ok(records.into_iter().map(AppointmentRow::from).collect())
    }
}
