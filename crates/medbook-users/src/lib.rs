//! Medbook — identity bounded context.
//!
//! Responsible for user lookup through the cache-aside layer and role
//! updates with an audit trail on the per-user update stream.

pub mod application;
pub mod domain;
pub mod infrastructure;
