//! Common error types used across the workspace.
//!
//! Each layer raises its own typed error and converts into [`CastingError`]
//! via `#[from]`. The HTTP adapter translates a [`CastingError`] into a status
//! code and JSON envelope exactly once, at the request boundary.

use std::error::Error as StdError;
use std::fmt;

use crate::auth::AuthError;
use crate::validation::ValidationError;

/// Root error for every fallible operation in the core.
#[derive(Debug, thiserror::Error)]
pub enum CastingError {
    /// The bearer credential was missing, malformed, invalid, or lacked scope.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request body failed a type or range rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The addressed resource does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The store rejected or failed the operation.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with id {id} not found")]
pub struct NotFoundError {
    /// Resource kind, e.g. `"Actor"`.
    pub entity: &'static str,
    /// Identifier as requested by the caller.
    pub id: String,
}

/// Whether a persistence failure was provoked by the caller's data or is an
/// internal fault of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceFault {
    /// A constraint in the store refused the write.
    Rejected,
    /// Connection, query, or decoding failure.
    Internal,
}

impl fmt::Display for PersistenceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected => f.write_str("rejected"),
            Self::Internal => f.write_str("internal"),
        }
    }
}

/// A failure reported by a repository adapter.
#[derive(Debug, thiserror::Error)]
#[error("{fault} persistence failure")]
pub struct PersistenceError {
    pub fault: PersistenceFault,
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

impl PersistenceError {
    /// Wrap a failure caused by data the caller supplied.
    pub fn rejected(source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            fault: PersistenceFault::Rejected,
            source: Box::new(source),
        }
    }

    /// Wrap a failure internal to the store.
    pub fn internal(source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            fault: PersistenceFault::Internal,
            source: Box::new(source),
        }
    }
}
