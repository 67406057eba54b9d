//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use medbook_api::routes;
use medbook_api::state::AppState;
use medbook_appointments::application::calendar::{CalendarOracle, SlotAvailability};
use medbook_appointments::infrastructure::pg_read_model::PgAppointmentReadModel;
use medbook_cache::{CacheAside, InMemoryCache};
use medbook_core::clock::Clock;
use medbook_core::error::DomainError;
use medbook_event_store::PgEventStore;
use medbook_projection::{PgCheckpointStore, Projector};
use medbook_test_support::FixedClock;
use medbook_users::infrastructure::pg_user_repository::PgUserRepository;

/// Fixed timestamp used across all integration tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_now()))
}

/// Oracle that reports every slot free with a canned booking reference.
struct AlwaysFreeCalendar;

#[async_trait]
impl CalendarOracle for AlwaysFreeCalendar {
    async fn check_slot(&self, _start: DateTime<Utc>) -> Result<SlotAvailability, DomainError> {
        Ok(SlotAvailability::Available {
            calendar_ref: "cal-123".to_owned(),
        })
    }
}

/// The app router plus the handles tests need to drive projection.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

/// Build the full app with real PostgreSQL stores, a deterministic clock,
/// an in-process cache, and an always-free calendar oracle. Uses the same
/// route structure as `main.rs`.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let clock = fixed_clock();
    let event_store = Arc::new(PgEventStore::new(pool.clone()));
    let cache = CacheAside::new(Arc::new(InMemoryCache::new(clock.clone())));
    let read_model = Arc::new(PgAppointmentReadModel::new(pool.clone()));
    let users = Arc::new(PgUserRepository::new(pool.clone()));

    let state = AppState::new(
        pool,
        clock,
        event_store,
        cache,
        Arc::new(AlwaysFreeCalendar),
        users,
        read_model,
    );

    TestApp {
        app: routes::router(state.clone()),
        state,
    }
}

/// Build a projector wired to the same stores and cache as the app.
pub fn build_projector(test_app: &TestApp) -> Projector {
    let pool = test_app.state.db_pool.clone();
    Projector::new(
        Arc::new(PgEventStore::new(pool.clone())),
        Arc::new(PgCheckpointStore::new(pool.clone())),
        Arc::new(PgAppointmentReadModel::new(pool)),
        test_app.state.cache.clone(),
    )
}

/// Identity headers for a gateway-verified doctor.
pub fn doctor_headers(doctor_id: Uuid, facilities: &str) -> Vec<(&'static str, String)> {
    vec![
        ("x-actor-id", doctor_id.to_string()),
        ("x-actor-name", "Dr. Acula".to_owned()),
        ("x-actor-email", "dracula@example.test".to_owned()),
        ("x-actor-facilities", facilities.to_owned()),
    ]
}

/// Send a request with optional JSON body and headers; returns the status
/// and the decoded JSON body (`Null` when the body is empty).
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
    headers: &[(&'static str, String)],
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, value);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Seed a user row and return its id.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, username, email, role) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(username)
        .bind(format!("{username}@example.test"))
        .bind(role)
        .execute(pool)
        .await
        .unwrap();
    id
}

/// Count the events recorded on one stream.
pub async fn events_on_stream(pool: &PgPool, stream_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM domain_events WHERE stream_id = $1")
        .bind(stream_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
