//! Taleforge — artifact store.
//!
//! `PostgreSQL` persistence for generated worlds, characters and detailed
//! plots.

pub mod pg_artifact_repository;
pub mod schema;

pub use pg_artifact_repository::PgArtifactRepository;
