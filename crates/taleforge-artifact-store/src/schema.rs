//! Artifact store database schema.
//!
//! Mirrors `migrations/0001_create_generated_artifacts.sql` for callers that
//! bootstrap a database without running migrations.

/// SQL to create the artifacts table.
pub const CREATE_ARTIFACTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS generated_artifacts (
    artifact_id     UUID PRIMARY KEY,
    kind            VARCHAR(32) NOT NULL,
    title           TEXT NOT NULL,
    body            JSONB NOT NULL,
    source_task_id  UUID,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_generated_artifacts_kind
    ON generated_artifacts (kind, created_at);
";
