//! Medbook — HTTP boundary.
//!
//! Thin Axum routes over the application layer: identity is established once
//! by the [`extract::Actor`] extractor, handlers check facility capability,
//! and everything else delegates to the bounded contexts.

pub mod calendar;
pub mod directory;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
