//! Author accounts. Listing and creation are reserved to administrators.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use crate::domain::{Role, User, mask_email, parse_id};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, UserRepository};

const MIN_PASSWORD_LEN: usize = 8;

/// Account fields. On update a blank password keeps the stored hash and a
/// missing `is_active` keeps the stored flag.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub is_active: Option<bool>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        self.passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    fn check_email(email: &str) -> Result<(), DomainError> {
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }
        Ok(())
    }

    async fn insert_new(&self, input: UserInput, is_admin: bool) -> Result<User, DomainError> {
        Self::check_email(&input.email)?;
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let mut user = User::new(input.username, input.email, self.hash(&input.password)?);
        user.is_admin = is_admin;

        let user = self.users.insert(user).await?;
        tracing::info!(
            user_id = %user.id,
            email = %mask_email(&user.email),
            is_admin,
            "User created"
        );
        Ok(user)
    }

    /// Create an active, non-admin account.
    pub async fn create(&self, role: Role, input: UserInput) -> Result<User, DomainError> {
        role.require_admin()?;
        self.insert_new(input, false).await
    }

    pub async fn list(&self, role: Role) -> Result<Vec<User>, DomainError> {
        role.require_admin()?;
        Ok(self.users.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        let id = parse_id(id)?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, DomainError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User", mask_email(email)))
    }

    pub async fn update(&self, id: &str, input: UserInput) -> Result<User, DomainError> {
        Self::check_email(&input.email)?;
        let new_hash = match input.password.is_empty() {
            true => None,
            false => Some(self.hash(&input.password)?),
        };
        let existing = self.get(id).await?;
        let password_hash = new_hash.unwrap_or_else(|| existing.password_hash.clone());

        let user = User {
            username: input.username,
            email: input.email,
            password_hash,
            is_active: input.is_active.unwrap_or(existing.is_active),
            updated_at: Utc::now(),
            ..existing
        };

        let id = user.id;
        self.users
            .update(user)
            .await
            .map_err(|e| DomainError::from_keyed(e, "User", id))
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id(id)?;
        self.users
            .delete(id)
            .await
            .map_err(|e| DomainError::from_keyed(e, "User", id))?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Check a login. Unknown email, inactive account and wrong password look the same.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .filter(|u| u.is_active)
            .ok_or(DomainError::Unauthorized)?;

        match self.passwords.verify(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) | Err(AuthError::HashingError(_)) => {
                tracing::debug!(email = %mask_email(email), "Rejected login");
                Err(DomainError::Unauthorized)
            }
            Err(e) => Err(DomainError::Internal(e.to_string())),
        }
    }

    /// Make sure an administrator with this email exists.
    pub async fn ensure_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            if !existing.is_admin {
                tracing::warn!(
                    email = %mask_email(email),
                    "Bootstrap admin email belongs to a non-admin user"
                );
            }
            return Ok(existing);
        }

        let input = UserInput {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            is_active: Some(true),
        };
        self.insert_new(input, true).await
    }
}
