//! Medbook — appointment booking bounded context.
//!
//! Responsible for gating appointment creation behind business rules and the
//! availability oracle, appending the resulting facts to per-doctor streams,
//! and serving the projected read model through the cache-aside layer.

pub mod application;
pub mod domain;
pub mod infrastructure;
