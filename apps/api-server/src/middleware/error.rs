//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use havamal_core::{DomainError, RepoError};
use havamal_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
///
/// The `&'static str` is the problem type slug, rendered as `/problems/<slug>`.
#[derive(Debug)]
pub enum AppError {
    NotFound(&'static str, String),
    BadRequest(&'static str, String),
    Unauthorized,
    Forbidden,
    Conflict(&'static str, String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(_, msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(_, msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(_, msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::BadRequest(..) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(..) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(kind, detail) => ErrorResponse::not_found(detail).with_type(kind),
            AppError::BadRequest(kind, detail) => {
                ErrorResponse::bad_request(detail).with_type(kind)
            }
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden => ErrorResponse::forbidden()
                .with_detail("Administrator role required"),
            AppError::Conflict(kind, detail) => ErrorResponse::conflict(detail).with_type(kind),
            AppError::Internal(detail) => {
                // Logged here, never returned to the client.
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let detail = err.to_string();
        match err {
            DomainError::InvalidIdentifier(_) => AppError::BadRequest("invalid-identifier", detail),
            DomainError::MissingAuthor => AppError::BadRequest("missing-author", detail),
            DomainError::Validation(_) => AppError::BadRequest("validation", detail),
            DomainError::NotFound { .. } => AppError::NotFound("not-found", detail),
            DomainError::AuthorNotFound(_) => AppError::NotFound("author-not-found", detail),
            DomainError::ParentNotFound(_) => AppError::NotFound("parent-not-found", detail),
            DomainError::CycleDetected { .. } => AppError::Conflict("cycle-detected", detail),
            DomainError::HasDependents { .. } => AppError::Conflict("has-dependents", detail),
            DomainError::Duplicate(_) => AppError::Conflict("duplicate", detail),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Internal(msg) => AppError::Internal(msg),
            DomainError::Persistence(repo) => repo.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => {
                AppError::NotFound("not-found", "Resource not found".to_string())
            }
            RepoError::Constraint(msg) => AppError::Conflict("constraint", msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status(err: DomainError) -> StatusCode {
        AppError::from(err).status_code()
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let id = Uuid::new_v4();
        assert_eq!(status(DomainError::InvalidIdentifier("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(DomainError::MissingAuthor), StatusCode::BAD_REQUEST);
        assert_eq!(status(DomainError::AuthorNotFound("a".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(DomainError::ParentNotFound(id)), StatusCode::NOT_FOUND);
        assert_eq!(
            status(DomainError::CycleDetected { node: id, parent: id }),
            StatusCode::CONFLICT
        );
        assert_eq!(status(DomainError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status(DomainError::Unauthorized), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn persistence_errors_pass_through() {
        assert_eq!(
            status(DomainError::Persistence(RepoError::Constraint("dup".into()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(DomainError::Persistence(RepoError::Query("boom".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let response = AppError::Internal("secret stack".into()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
