//! Storage-specific error type wrapping sqlx errors.

use plan_accion_domain::error::{ConflictError, PlanError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    /// The constraint this error violated, if it is a constraint error.
    fn conflict(&self) -> Option<ConflictError> {
        let Self::Database(sqlx::Error::Database(db)) = self else {
            return None;
        };
        if db.is_unique_violation() {
            Some(ConflictError::Duplicate)
        } else if db.is_foreign_key_violation() {
            Some(ConflictError::Reference)
        } else {
            None
        }
    }
}

impl From<StorageError> for PlanError {
    fn from(err: StorageError) -> Self {
        match err.conflict() {
            Some(conflict) => {
                tracing::debug!(error = %err, ?conflict, "constraint violation");
                Self::Conflict(conflict)
            }
            None => Self::Storage(Box::new(err)),
        }
    }
}

/// Shorthand for `map_err(StorageError::from)` followed by `?` into [`PlanError`].
pub(crate) fn db(err: sqlx::Error) -> PlanError {
    StorageError::from(err).into()
}
