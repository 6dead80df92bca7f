//! Storage-specific error type wrapping sqlx errors.

use sqlx::error::ErrorKind;

use casting_domain::error::{CastingError, PersistenceError};

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
    /// `true` when a table constraint refused the write, i.e. the data the
    /// caller supplied is at fault rather than the store.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(err)) => matches!(
                err.kind(),
                ErrorKind::CheckViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
            ),
            _ => false,
        }
    }
}

impl From<StorageError> for CastingError {
    fn from(err: StorageError) -> Self {
        if err.is_constraint_violation() {
            PersistenceError::rejected(err).into()
        } else {
            PersistenceError::internal(err).into()
        }
    }
}
