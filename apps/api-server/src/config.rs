//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use havamal_core::domain::{CascadePolicy, DeletePolicy};
use havamal_infra::JwtConfig;
use havamal_infra::database::DatabaseConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Administrator account created at startup when absent.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub cascade: CascadePolicy,
    pub admin: Option<AdminSeed>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `get`, which returns the raw value of a variable.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database = match get("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => {
                let mut db = DatabaseConfig::new(url);
                db.max_connections = parse_or(&get, "DB_MAX_CONNECTIONS", db.max_connections)?;
                db.min_connections = parse_or(&get, "DB_MIN_CONNECTIONS", db.min_connections)?;
                Some(db)
            }
            None => None,
        };

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: get("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parse_or(&get, "JWT_EXPIRATION_HOURS", defaults.expiration_hours)?,
            issuer: get("JWT_ISSUER").unwrap_or(defaults.issuer),
        };
        if jwt.lifetime().is_none() {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_HOURS",
                value: jwt.expiration_hours.to_string(),
                reason: "must be between 1 and 8784 hours".to_string(),
            });
        }

        let policy = CascadePolicy::default();
        let cascade = CascadePolicy {
            post_categories: policy_or(&get, "CASCADE_POST_CATEGORIES", policy.post_categories)?,
            post_versions: policy_or(&get, "CASCADE_POST_VERSIONS", policy.post_versions)?,
            navigation_children: policy_or(
                &get,
                "CASCADE_NAVIGATION_CHILDREN",
                policy.navigation_children,
            )?,
        };

        let admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.is_empty() => Some(AdminSeed {
                username: get("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&get, "PORT", 8080)?,
            database,
            jwt,
            cascade,
            admin,
        })
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn policy_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: DeletePolicy,
) -> Result<DeletePolicy, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|reason| ConfigError::Invalid { key, value, reason }),
    }
}
