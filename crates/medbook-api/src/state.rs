//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use medbook_appointments::application::calendar::CalendarOracle;
use medbook_appointments::application::read_model::AppointmentReadModel;
use medbook_cache::CacheAside;
use medbook_core::clock::Clock;
use medbook_core::store::EventStore;
use medbook_users::application::repository::UserRepository;

/// Application state shared across all request handlers.
///
/// Every handle is explicitly constructed at startup and shared by
/// reference; nothing here is an ambient singleton.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Authoritative clock.
    pub clock: Arc<dyn Clock>,
    /// Append-only event store.
    pub event_store: Arc<dyn EventStore>,
    /// Cache-aside layer over the shared key-value cache.
    pub cache: CacheAside,
    /// Availability oracle for appointment slots.
    pub calendar: Arc<dyn CalendarOracle>,
    /// User repository.
    pub users: Arc<dyn UserRepository>,
    /// Projected appointment read model.
    pub appointments: Arc<dyn AppointmentReadModel>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        db_pool: PgPool,
        clock: Arc<dyn Clock>,
        event_store: Arc<dyn EventStore>,
        cache: CacheAside,
        calendar: Arc<dyn CalendarOracle>,
        users: Arc<dyn UserRepository>,
        appointments: Arc<dyn AppointmentReadModel>,
    ) -> Self {
        Self {
            db_pool,
            clock,
            event_store,
            cache,
            calendar,
            users,
            appointments,
        }
    }
}
