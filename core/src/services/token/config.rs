//! Configuration for the token authority and rotation coordinator

use jsonwebtoken::Algorithm;
use sa_shared::config::JwtConfig;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::entities::token::JWT_ISSUER;
use crate::errors::DomainError;

/// Immutable settings injected at construction
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HMAC signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family)
    pub algorithm: Algorithm,
    /// JWT issuer claim
    pub issuer: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh secret lifetime, measured from issuance
    pub refresh_ttl: Duration,
    /// bcrypt cost factor
    pub hash_cost: u32,
    /// Upper bound for one store round-trip
    pub store_timeout: Duration,
    /// Upper bound for delivering an origin-change notice
    pub notify_timeout: Duration,
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("hash_cost", &self.hash_cost)
            .field("store_timeout", &self.store_timeout)
            .field("notify_timeout", &self.notify_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: sa_shared::config::auth::DEVELOPMENT_SECRET.to_string(),
            algorithm: Algorithm::HS512,
            issuer: JWT_ISSUER.to_string(),
            access_ttl: Duration::from_secs(5 * 60),
            refresh_ttl: Duration::from_secs(72 * 60 * 60),
            hash_cost: sa_shared::config::auth::DEFAULT_HASH_COST,
            store_timeout: Duration::from_secs(5),
            notify_timeout: Duration::from_secs(2),
        }
    }
}

impl TokenServiceConfig {
    /// Build from the application's JWT section
    pub fn from_jwt_config(jwt: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&jwt.algorithm).map_err(|_| DomainError::Validation {
            message: format!("unknown JWT algorithm: {}", jwt.algorithm),
        })?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(DomainError::Validation {
                message: format!(
                    "{} needs a key pair; only HMAC algorithms are supported",
                    jwt.algorithm
                ),
            });
        }

        Ok(Self {
            jwt_secret: jwt.secret.clone(),
            algorithm,
            issuer: jwt.issuer.clone(),
            access_ttl: jwt.access_ttl(),
            refresh_ttl: jwt.refresh_ttl(),
            hash_cost: jwt.hash_cost,
            store_timeout: jwt.store_timeout(),
            notify_timeout: jwt.notify_timeout(),
        })
    }
}
