//! The appointments projector.
//!
//! One background task per projected category. Each cycle reads the durable
//! checkpoint, fetches events strictly after it, applies them in stream
//! order through idempotent upserts, advances the checkpoint, and finally
//! invalidates the cache keys the batch touched. The ordering is load-
//! bearing: read model first, checkpoint second, cache last — a crash at any
//! point redelivers events that are safe to re-apply.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use medbook_appointments::application::read_model::{AppointmentReadModel, AppointmentRow};
use medbook_appointments::domain::events::AppointmentEventKind;
use medbook_cache::{CacheAside, keys};
use medbook_core::checkpoint::CheckpointStore;
use medbook_core::error::DomainError;
use medbook_core::retry;
use medbook_core::store::{APPOINTMENTS_CATEGORY, EventStore, RecordedEvent};

/// Consumer lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectorState {
    /// Waiting for the next poll.
    Idle,
    /// Reading the checkpoint and fetching a batch.
    Fetching,
    /// Applying fetched events to the read model.
    Applying,
    /// Advancing the checkpoint past an applied batch.
    Checkpointing,
    /// Halted on an unrecoverable read-model error. The checkpoint stays
    /// frozen so the same events are retried on restart.
    Faulted,
}

/// Checkpoint-tracked consumer of the appointments category.
pub struct Projector {
    store: Arc<dyn EventStore>,
    checkpoints: Arc<dyn CheckpointStore>,
    read_model: Arc<dyn AppointmentReadModel>,
    cache: CacheAside,
    state: ProjectorState,
    batch_size: i64,
    poll_interval: Duration,
}

impl Projector {
    /// Creates a projector with the default batch size and poll interval.
    #[must_use]
    pub fn new(
        store: Arc<dyn EventStore>,
        checkpoints: Arc<dyn CheckpointStore>,
        read_model: Arc<dyn AppointmentReadModel>,
        cache: CacheAside,
    ) -> Self {
        Self {
            store,
            checkpoints,
            read_model,
            cache,
            state: ProjectorState::Idle,
            batch_size: 100,
            poll_interval: Duration::from_millis(500),
        }
    }

    /// Overrides the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Overrides the catch-up batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// The projector's current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ProjectorState {
        self.state
    }

    /// Runs the poll loop until `shutdown` fires or the projector faults.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(category = APPOINTMENTS_CATEGORY, "projector started");
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!(category = APPOINTMENTS_CATEGORY, "projector shutting down");
                    return;
                }
                () = tokio::time::sleep(self.poll_interval) => {
                    match self.run_once().await {
                        Ok(0) => {}
                        Ok(applied) => {
                            tracing::debug!(category = APPOINTMENTS_CATEGORY, applied, "batch projected");
                        }
                        Err(err) if err.is_transient() => {
                            tracing::warn!(
                                category = APPOINTMENTS_CATEGORY,
                                error = %err,
                                "projection cycle failed, retrying next poll"
                            );
                        }
                        Err(err) => {
                            // The one condition that should page an operator:
                            // this category makes no forward progress until
                            // the fault is resolved and the process restarts.
                            tracing::error!(
                                category = APPOINTMENTS_CATEGORY,
                                error = %err,
                                "projection halted, checkpoint frozen"
                            );
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Runs one fetch/apply/checkpoint cycle and returns the number of
    /// events applied.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TransientIo`] when a store was unreachable
    /// (the cycle is safe to repeat) and [`DomainError::ProjectionFault`]
    /// when an event cannot be applied (the projector halts).
    pub async fn run_once(&mut self) -> Result<usize, DomainError> {
        match self.cycle().await {
            Ok(applied) => {
                self.state = ProjectorState::Idle;
                Ok(applied)
            }
            Err(err) => {
                self.state = if matches!(err, DomainError::ProjectionFault(_)) {
                    ProjectorState::Faulted
                } else {
                    ProjectorState::Idle
                };
                Err(err)
            }
        }
    }

    async fn cycle(&mut self) -> Result<usize, DomainError> {
        self.state = ProjectorState::Fetching;
        let position = self.checkpoints.get(APPOINTMENTS_CATEGORY).await?;
        let batch = self
            .store
            .read_category(APPOINTMENTS_CATEGORY, position, self.batch_size)
            .await?;
        let Some(last) = batch.last() else {
            return Ok(0);
        };
        let last_position = last.global_position;

        self.state = ProjectorState::Applying;
        let mut touched_keys = Vec::new();
        for event in &batch {
            if let Some(key) = self.apply(event).await? {
                if !touched_keys.contains(&key) {
                    touched_keys.push(key);
                }
            }
        }

        self.state = ProjectorState::Checkpointing;
        retry::with_backoff("advance appointments checkpoint", || {
            self.checkpoints.advance(APPOINTMENTS_CATEGORY, last_position)
        })
        .await?;

        // Only after the read-model batch and checkpoint are durable may the
        // cache entries go; invalidating earlier would let a reader
        // repopulate them with pre-projection state.
        for key in &touched_keys {
            if let Err(err) = self.cache.invalidate(key).await {
                tracing::warn!(key = %key, error = %err, "cache invalidation failed, entry expires by ttl");
            }
        }

        Ok(batch.len())
    }

    /// Applies one event; returns the cache key it made stale, if any.
    async fn apply(&self, event: &RecordedEvent) -> Result<Option<String>, DomainError> {
        let kind: AppointmentEventKind =
            serde_json::from_value(event.payload.clone()).map_err(|e| {
                DomainError::ProjectionFault(format!(
                    "undecodable payload at position {}: {e}",
                    event.global_position
                ))
            })?;

        match kind {
            AppointmentEventKind::AppointmentCreated(created) => {
                let row = AppointmentRow {
                    id: created.appointment_id,
                    doctor_id: created.doctor_id,
                    patient_id: created.patient_id,
                    start: created.start,
                    facility_name: created.facility_name.clone(),
                    external_calendar_ref: created.external_calendar_ref,
                    created_at: event.occurred_at,
                    updated_at: event.occurred_at,
                };
                self.read_model.upsert(&row).await?;
                tracing::debug!(
                    appointment_id = %created.appointment_id,
                    stream_id = %event.stream_id,
                    position = event.global_position,
                    "appointment projected"
                );
                Ok(Some(keys::appointments_by_doctor_and_facility(
                    &created.facility_name,
                    created.doctor_id,
                )))
            }
            // Email confirmations live on the audit stream and carry no
            // read-model state.
            AppointmentEventKind::AppointmentEmailSent(_) => Ok(None),
        }
    }
}
