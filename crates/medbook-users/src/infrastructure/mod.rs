//! Infrastructure layer: PostgreSQL user repository.

pub mod pg_user_repository;
