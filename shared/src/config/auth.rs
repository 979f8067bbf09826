//! Authentication and token lifecycle configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Secret shipped for local development only
pub const DEVELOPMENT_SECRET: &str = "development-secret-please-change-in-production";

/// bcrypt cost for refresh secret hashes (about 100ms per verification)
pub const DEFAULT_HASH_COST: u32 = 10;

/// JWT and refresh token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Shared secret for signing access tokens
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: u64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: u64,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Algorithm for JWT signing (HS256, HS384, HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// bcrypt cost factor for refresh secret hashes
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,

    /// Upper bound for a single store operation in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Upper bound for an origin-change notification in milliseconds
    #[serde(default = "default_notify_timeout_ms")]
    pub notify_timeout_ms: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEVELOPMENT_SECRET),
            access_token_expiry: 300,      // 5 minutes
            refresh_token_expiry: 259200,  // 72 hours
            issuer: default_issuer(),
            algorithm: default_algorithm(),
            hash_cost: default_hash_cost(),
            store_timeout_ms: default_store_timeout_ms(),
            notify_timeout_ms: default_notify_timeout_ms(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: u64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in hours
    pub fn with_refresh_expiry_hours(mut self, hours: u64) -> Self {
        self.refresh_token_expiry = hours * 3600;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_expiry)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_expiry)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }
}

/// Cookie settings for the refresh secret transport
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Cookie carrying the refresh secret
    #[serde(default = "default_refresh_cookie")]
    pub refresh_cookie_name: String,

    /// Cookie carrying the subject identifier
    #[serde(default = "default_subject_cookie")]
    pub subject_cookie_name: String,

    /// Cookie secure flag (HTTPS only)
    #[serde(default)]
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_cookie_name: default_refresh_cookie(),
            subject_cookie_name: default_subject_cookie(),
            secure: false,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Cookie configuration
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_issuer() -> String {
    String::from("simple-auth")
}

fn default_algorithm() -> String {
    String::from("HS512")
}

fn default_hash_cost() -> u32 {
    DEFAULT_HASH_COST
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_notify_timeout_ms() -> u64 {
    2_000
}

fn default_refresh_cookie() -> String {
    String::from("refresh_token")
}

fn default_subject_cookie() -> String {
    String::from("guid")
}
