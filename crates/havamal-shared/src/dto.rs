//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user's public information. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn bearer(access_token: String, expires_in: u64, user: UserResponse) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// Post/category pair, as raw id strings so malformed ids reach the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationRequest {
    #[serde(alias = "postId")]
    pub post_id: String,
    #[serde(alias = "categoryId")]
    pub category_id: String,
}

/// Plain acknowledgement for writes that return no entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn association_accepts_camel_case() {
        let req: AssociationRequest =
            serde_json::from_str(r#"{"postId":"a","categoryId":"b"}"#).unwrap();
        assert_eq!(req.post_id, "a");
        assert_eq!(req.category_id, "b");
    }

    #[test]
    fn bearer_sets_token_type() {
        let user = UserResponse {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            role: "member".into(),
            is_active: true,
            created_at: Utc::now(),
        };
        let auth = AuthResponse::bearer("token".into(), 3600, user);
        assert_eq!(auth.token_type, "Bearer");
    }
}
