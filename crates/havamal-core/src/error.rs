//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Entity not found: {entity_type} {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error("No user with email {0}")]
    AuthorNotFound(String),

    #[error("Either an author id or an author email is required")]
    MissingAuthor,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Parent navigation item {0} does not exist")]
    ParentNotFound(Uuid),

    #[error("Making {parent} the parent of {node} would create a cycle")]
    CycleDetected { node: Uuid, parent: Uuid },

    #[error("{entity_type} {id} still has dependent records")]
    HasDependents { entity_type: &'static str, id: Uuid },

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Administrator role required")]
    Forbidden,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] RepoError),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }

    /// Maps a keyed repository miss to `NotFound`, passing anything else through.
    pub(crate) fn from_keyed(
        err: RepoError,
        entity_type: &'static str,
        key: impl ToString,
    ) -> Self {
        match err {
            RepoError::NotFound => Self::not_found(entity_type, key),
            other => Self::Persistence(other),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
