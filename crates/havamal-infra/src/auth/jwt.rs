//! JWT token service implementation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use havamal_core::domain::{Role, User};
use havamal_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";
const MAX_EXPIRATION_HOURS: i64 = 24 * 366;

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "havamal".to_string(),
        }
    }
}

impl JwtConfig {
    /// Token lifetime, or `None` unless `expiration_hours` is between one hour
    /// and a year.
    pub fn lifetime(&self) -> Option<TimeDelta> {
        if !(1..=MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return None;
        }
        TimeDelta::try_hours(self.expiration_hours)
    }
}

/// Wire form of the claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    exp: i64,
    iat: i64,
    iss: String,
}

/// HS256 token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        if config.secret == DEFAULT_SECRET {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let lifetime = self.config.lifetime().ok_or_else(|| {
            AuthError::InvalidToken(format!(
                "token lifetime of {} hours is out of range",
                self.config.expiration_hours
            ))
        })?;
        let now = Utc::now();
        let exp = now + lifetime;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role().as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let role = Role::from_name(&data.claims.role)
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown role {}", data.claims.role)))?;

        Ok(TokenClaims {
            user_id,
            email: data.claims.email,
            role,
            exp: data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.lifetime().map_or(0, |d| d.num_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, issuer: &str) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 1,
            issuer: issuer.to_string(),
        })
    }

    fn member() -> User {
        User::new("ada".into(), "ada@example.com".into(), "hash".into())
    }

    #[test]
    fn test_round_trip_carries_role() {
        let service = service("test-secret-key", "test-issuer");
        let mut admin = member();
        admin.is_admin = true;

        let token = service.generate_token(&admin).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, admin.id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_member_token_has_member_role() {
        let service = service("test-secret-key", "test-issuer");
        let token = service.generate_token(&member()).unwrap();

        assert_eq!(service.validate_token(&token).unwrap().role, Role::Member);
    }

    #[test]
    fn test_validate_invalid_token() {
        let service = service("test-secret-key", "test-issuer");

        let result = service.validate_token("invalid-token");
        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_validate_wrong_issuer_token() {
        let token = service("same-secret", "issuer1")
            .generate_token(&member())
            .unwrap();

        assert!(service("same-secret", "issuer2").validate_token(&token).is_err());
    }

    #[test]
    fn test_validate_wrong_secret_token() {
        let token = service("secret-a", "test").generate_token(&member()).unwrap();

        assert!(service("secret-b", "test").validate_token(&token).is_err());
    }

    #[test]
    fn test_expiration_seconds() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: 24,
            ..JwtConfig::default()
        });

        assert_eq!(service.expiration_seconds(), 86400);
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: i64::MAX,
            ..JwtConfig::default()
        });

        assert!(matches!(
            service.generate_token(&member()),
            Err(AuthError::InvalidToken(_))
        ));
        assert_eq!(service.expiration_seconds(), 0);
    }
}
