//! Medbook API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use medbook_api::error::AppError;
use medbook_api::{calendar, routes, state};
use medbook_appointments::infrastructure::pg_read_model::PgAppointmentReadModel;
use medbook_cache::{CacheAside, InMemoryCache};
use medbook_core::clock::{Clock, SystemClock};
use medbook_event_store::PgEventStore;
use medbook_projection::{PgCheckpointStore, Projector};
use medbook_users::infrastructure::pg_user_repository::PgUserRepository;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting medbook API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Create database connection pool and apply migrations.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Build explicitly constructed, shared handles.
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let event_store = Arc::new(PgEventStore::new(pool.clone()));
    let cache = CacheAside::new(Arc::new(InMemoryCache::new(clock.clone())));
    let read_model = Arc::new(PgAppointmentReadModel::new(pool.clone()));
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let checkpoints = Arc::new(PgCheckpointStore::new(pool.clone()));

    let app_state = state::AppState::new(
        pool,
        clock,
        event_store.clone(),
        cache.clone(),
        Arc::new(calendar::PermissiveCalendar),
        users,
        read_model.clone(),
    );

    // Spawn the projector as an independent background task.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let projector = Projector::new(event_store, checkpoints, read_model, cache);
    let projector_handle = tokio::spawn(projector.run(shutdown_rx));

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // Stop the projector after the server drains.
    let _ = shutdown_tx.send(true);
    let _ = projector_handle.await;

    Ok(())
}
