//! Integration tests for the appointments endpoints.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;
use uuid::Uuid;

fn booking_body(patient_id: Uuid, start: chrono::DateTime<chrono::Utc>) -> serde_json::Value {
    serde_json::json!({
        "facility_name": "northside",
        "patient_id": patient_id,
        "start": start,
        "summary": "Checkup",
        "description": "Annual checkup",
    })
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_accepted_booking_appends_event_to_doctor_stream(pool: PgPool) {
    // Arrange
    let patient_id = common::seed_user(&pool, "alice", "patient").await;
    let test_app = common::build_test_app(pool.clone());
    let doctor_id = Uuid::new_v4();
    let start = common::fixed_now() + chrono::Duration::hours(24);

    // Act
    let (status, json) = common::send(
        test_app.app,
        "POST",
        "/api/v1/appointments",
        Some(&booking_body(patient_id, start)),
        &common::doctor_headers(doctor_id, "northside"),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["status"], "accepted");
    assert!(json["appointment_id"].is_string());

    let stream_id = format!("appointments:northside:{doctor_id}");
    assert_eq!(common::events_on_stream(&pool, &stream_id).await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_booking_becomes_visible_once_projected(pool: PgPool) {
    // Arrange
    let patient_id = common::seed_user(&pool, "alice", "patient").await;
    let test_app = common::build_test_app(pool.clone());
    let doctor_id = Uuid::new_v4();
    let headers = common::doctor_headers(doctor_id, "northside");
    let start = common::fixed_now() + chrono::Duration::hours(24);

    let (status, accepted) = common::send(
        test_app.app.clone(),
        "POST",
        "/api/v1/appointments",
        Some(&booking_body(patient_id, start)),
        &headers,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    // The acceptance contract: nothing visible before projection.
    let (status, before) = common::send(
        test_app.app.clone(),
        "GET",
        "/api/v1/appointments?facility_name=northside",
        None,
        &headers,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before.as_array().unwrap().len(), 0);

    // Act: drive the projector one cycle.
    let mut projector = common::build_projector(&test_app);
    let applied = projector.run_once().await.unwrap();
    assert_eq!(applied, 1);

    // Assert: the stale cached list was evicted and the row is visible.
    let (status, after) = common::send(
        test_app.app,
        "GET",
        "/api/v1/appointments?facility_name=northside",
        None,
        &headers,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = after.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], accepted["appointment_id"]);
    assert_eq!(rows[0]["doctor_id"], serde_json::json!(doctor_id));
    assert_eq!(rows[0]["patient_id"], serde_json::json!(patient_id));
    assert_eq!(rows[0]["external_calendar_ref"], "cal-123");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_past_start_is_rejected_with_no_event(pool: PgPool) {
    let patient_id = common::seed_user(&pool, "alice", "patient").await;
    let test_app = common::build_test_app(pool.clone());
    let doctor_id = Uuid::new_v4();
    let start = common::fixed_now() - chrono::Duration::hours(1);

    let (status, json) = common::send(
        test_app.app,
        "POST",
        "/api/v1/appointments",
        Some(&booking_body(patient_id, start)),
        &common::doctor_headers(doctor_id, "northside"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");

    let stream_id = format!("appointments:northside:{doctor_id}");
    assert_eq!(common::events_on_stream(&pool, &stream_id).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_patient_is_not_found(pool: PgPool) {
    let test_app = common::build_test_app(pool);
    let doctor_id = Uuid::new_v4();
    let start = common::fixed_now() + chrono::Duration::hours(24);

    let (status, json) = common::send(
        test_app.app,
        "POST",
        "/api/v1/appointments",
        Some(&booking_body(Uuid::new_v4(), start)),
        &common::doctor_headers(doctor_id, "northside"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_foreign_facility_is_forbidden(pool: PgPool) {
    let patient_id = common::seed_user(&pool, "alice", "patient").await;
    let test_app = common::build_test_app(pool);
    let doctor_id = Uuid::new_v4();
    let start = common::fixed_now() + chrono::Duration::hours(24);

    let (status, json) = common::send(
        test_app.app,
        "POST",
        "/api/v1/appointments",
        Some(&booking_body(patient_id, start)),
        &common::doctor_headers(doctor_id, "southside"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_missing_identity_is_unauthorized(pool: PgPool) {
    let test_app = common::build_test_app(pool);
    let start = common::fixed_now() + chrono::Duration::hours(24);

    let (status, json) = common::send(
        test_app.app,
        "POST",
        "/api/v1/appointments",
        Some(&booking_body(Uuid::new_v4(), start)),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
}
