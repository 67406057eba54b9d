//! Medbook — PostgreSQL event store.
//!
//! Implements the [`medbook_core::store::EventStore`] trait over a single
//! `domain_events` table: per-stream contiguous sequence numbers guarded by a
//! unique constraint, plus a `BIGSERIAL` global position used for projector
//! catch-up reads. The table is created by the workspace `migrations/`.

pub mod pg_event_store;

pub use pg_event_store::PgEventStore;
