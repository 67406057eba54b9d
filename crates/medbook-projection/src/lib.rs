//! Medbook — projection pipeline.
//!
//! Turns appended events into read-model state exactly-once from the read
//! model's perspective: the projector applies events through idempotent
//! upserts and advances its durable checkpoint only after the read-model
//! writes commit, so at-least-once delivery (crashes, duplicate bus
//! messages) never loses or double-applies state.

pub mod checkpoint;
pub mod consumer;
pub mod projector;

pub use checkpoint::PgCheckpointStore;
pub use projector::{Projector, ProjectorState};
