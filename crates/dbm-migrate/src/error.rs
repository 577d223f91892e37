//! Error types for the migration engine.

use dbm_core::classify::{ConstraintKind, ErrorClassifier};
use dbm_core::DdlError;

/// A database error recognised as a constraint violation.
#[derive(Debug, thiserror::Error)]
#[error("{kind} constraint violation on '{key}'")]
pub struct ConstraintError {
    /// Constraint family.
    pub kind: ConstraintKind,
    /// Constraint or key name reported by the server.
    pub key: String,
    /// The driver error this was extracted from.
    #[source]
    pub source: sqlx::Error,
}

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A changeset could not be rendered for the active dialect.
    #[error("DDL error: {0}")]
    Ddl(#[from] DdlError),

    /// Database error during migration execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A statement violated a unique, foreign key or check constraint.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// The history table records a version that was never registered.
    #[error("Missing local migration: {0}")]
    MissingLocalVersion(i64),

    /// The same version number was registered twice.
    #[error("Duplicate migration version: {0}")]
    DuplicateVersion(i64),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (reading configuration files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MigrateError {
    /// Returns the constraint violation, if this error is one.
    #[must_use]
    pub const fn as_constraint(&self) -> Option<&ConstraintError> {
        match self {
            Self::Constraint(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Wraps a driver error, promoting recognised constraint violations.
///
/// Server errors are classified on their full display form, which keeps
/// the vendor code prefix (`1062 (23000): ...` on MySQL).
#[must_use]
pub fn classify<C: ErrorClassifier + ?Sized>(classifier: &C, err: sqlx::Error) -> MigrateError {
    let message = match &err {
        sqlx::Error::Database(db) => db.to_string(),
        other => other.to_string(),
    };

    match classifier.classify(&message) {
        Some(violation) => MigrateError::Constraint(ConstraintError {
            kind: violation.kind,
            key: violation.key,
            source: err,
        }),
        None => MigrateError::Database(err),
    }
}
