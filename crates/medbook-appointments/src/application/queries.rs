//! Read queries for the appointments context.

use std::time::Duration;

use medbook_cache::{CacheAside, keys};
use medbook_core::error::DomainError;
use uuid::Uuid;

use super::read_model::{AppointmentReadModel, AppointmentRow};

/// How long a projected appointment list may be served from cache.
pub const APPOINTMENTS_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Returns the projected appointments for one doctor at one facility,
/// through the cache-aside layer.
///
/// # Errors
///
/// Returns [`DomainError::TransientIo`] when the read model is unreachable
/// on a cache miss.
pub async fn appointments_by_facility_and_doctor(
    facility_name: &str,
    doctor_id: Uuid,
    cache: &CacheAside,
    read_model: &dyn AppointmentReadModel,
) -> Result<Vec<AppointmentRow>, DomainError> {
    let key = keys::appointments_by_doctor_and_facility(facility_name, doctor_id);
    cache
        .get_or_load(&key, APPOINTMENTS_CACHE_TTL, || async {
            read_model
                .list_by_facility_and_doctor(facility_name, doctor_id)
                .await
        })
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use medbook_cache::InMemoryCache;
    use medbook_core::clock::Clock;
    use medbook_test_support::FixedClock;

    use super::*;

    /// Read model holding a fixed row list, counting queries.
    struct StaticReadModel {
        rows: Vec<AppointmentRow>,
        queries: AtomicU32,
    }

    #[async_trait]
    impl AppointmentReadModel for StaticReadModel {
        async fn upsert(&self, _row: &AppointmentRow) -> Result<(), DomainError> {
            Ok(())
        }

        async fn list_by_facility_and_doctor(
            &self,
            facility_name: &str,
            doctor_id: Uuid,
        ) -> Result<Vec<AppointmentRow>, DomainError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .rows
                .iter()
                .filter(|r| r.facility_name == facility_name && r.doctor_id == doctor_id)
                .cloned()
                .collect())
        }
    }

    fn make_row(facility_name: &str, doctor_id: Uuid) -> AppointmentRow {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        AppointmentRow {
            id: Uuid::new_v4(),
            doctor_id,
            patient_id: Uuid::new_v4(),
            start: at + chrono::Duration::hours(2),
            facility_name: facility_name.to_owned(),
            external_calendar_ref: "cal-123".to_owned(),
            created_at: at,
            updated_at: at,
        }
    }

    fn cache() -> CacheAside {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ));
        CacheAside::new(Arc::new(InMemoryCache::new(clock)))
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        // Arrange
        let doctor_id = Uuid::new_v4();
        let read_model = StaticReadModel {
            rows: vec![make_row("northside", doctor_id)],
            queries: AtomicU32::new(0),
        };
        let cache = cache();

        // Act
        let first =
            appointments_by_facility_and_doctor("northside", doctor_id, &cache, &read_model)
                .await
                .unwrap();
        let second =
            appointments_by_facility_and_doctor("northside", doctor_id, &cache, &read_model)
                .await
                .unwrap();

        // Assert
        assert_eq!(first, second);
        assert_eq!(read_model.queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_doctors_do_not_share_cache_entries() {
        let doctor_a = Uuid::new_v4();
        let doctor_b = Uuid::new_v4();
        let read_model = StaticReadModel {
            rows: vec![make_row("northside", doctor_a)],
            queries: AtomicU32::new(0),
        };
        let cache = cache();

        let a = appointments_by_facility_and_doctor("northside", doctor_a, &cache, &read_model)
            .await
            .unwrap();
        let b = appointments_by_facility_and_doctor("northside", doctor_b, &cache, &read_model)
            .await
            .unwrap();

        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
        assert_eq!(read_model.queries.load(Ordering::SeqCst), 2);
    }
}
