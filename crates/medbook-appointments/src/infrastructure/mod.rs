//! Infrastructure layer: PostgreSQL read-model repository.

pub mod pg_read_model;
