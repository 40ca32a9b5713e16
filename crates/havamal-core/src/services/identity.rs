//! Author identity resolution for posts.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, mask_email, parse_id, supplied};
use crate::error::DomainError;
use crate::ports::UserRepository;

/// Resolves a post author from a supplied id or by email lookup.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Validates the id format only. Existence is left to the store's foreign key.
    pub fn resolve_id(&self, raw: &str) -> Result<Uuid, DomainError> {
        parse_id(raw)
    }

    /// Looks the user up by email.
    pub async fn resolve_email(&self, email: &str) -> Result<User, DomainError> {
        tracing::debug!(author_email = %mask_email(email), "Resolving author by email");

        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::AuthorNotFound(email.to_string()))
    }

    /// An id wins over an email when both are supplied; blank values count as absent.
    pub async fn resolve(
        &self,
        author_id: Option<&str>,
        author_email: Option<&str>,
    ) -> Result<Uuid, DomainError> {
        match (supplied(author_id), supplied(author_email)) {
            (Some(id), _) => self.resolve_id(id),
            (None, Some(email)) => Ok(self.resolve_email(email).await?.id),
            (None, None) => Err(DomainError::MissingAuthor),
        }
    }
}
