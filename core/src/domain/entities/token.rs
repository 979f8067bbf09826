//! Token entities for session issuance and rotation.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::errors::{DomainError, TokenError};

/// Default JWT issuer
pub const JWT_ISSUER: &str = "simple-auth";

/// Random bytes in a refresh secret (256 bits)
pub const REFRESH_SECRET_BYTES: usize = 32;

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (client GUID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates claims for an access token valid for `ttl` from now
    pub fn new_access_token(
        subject: &str,
        ttl: Duration,
        issuer: &str,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();
        let expiry = ChronoDuration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| TokenError::Signing {
                message: format!("access token ttl out of range: {:?}", ttl),
            })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        })
    }
}

/// The single persisted session record for a subject
///
/// Holds only a one-way hash of the current refresh secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokenRecord {
    /// Opaque client identifier, unique key
    pub subject: String,

    /// Address used for out-of-band notices
    pub contact: String,

    /// Network origin the record was issued to
    pub origin: String,

    /// bcrypt hash of the current refresh secret
    pub secret_hash: String,

    /// When the current refresh secret was issued
    pub issued_at: DateTime<Utc>,
}

impl std::fmt::Debug for SessionTokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenRecord")
            .field("subject", &self.subject)
            .field("contact", &self.contact)
            .field("origin", &self.origin)
            .field("secret_hash", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

impl SessionTokenRecord {
    /// Creates a record issued now
    pub fn new(
        subject: impl Into<String>,
        contact: impl Into<String>,
        origin: impl Into<String>,
        secret_hash: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            contact: contact.into(),
            origin: origin.into(),
            secret_hash: secret_hash.into(),
            issued_at: Utc::now(),
        }
    }

    /// The record that replaces this one after a successful rotation.
    ///
    /// Subject, contact and origin carry over; only the hash and the
    /// issue time change.
    pub fn rotated(&self, secret_hash: impl Into<String>) -> Self {
        Self {
            subject: self.subject.clone(),
            contact: self.contact.clone(),
            origin: self.origin.clone(),
            secret_hash: secret_hash.into(),
            issued_at: Utc::now(),
        }
    }

    /// True once strictly more than `ttl` has elapsed since issuance
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match (now - self.issued_at).to_std() {
            Ok(age) => age > ttl,
            // issued_at in the future (clock skew)
            Err(_) => false,
        }
    }

    /// Whether `origin` differs from the origin on record
    pub fn origin_differs(&self, origin: &str) -> bool {
        self.origin != origin
    }
}

/// Token pair handed back to the caller
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Raw refresh secret; the only copy outside the hash
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: u64,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("access_expires_in", &self.access_expires_in)
            .finish()
    }
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String, access_ttl: Duration) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in: access_ttl.as_secs(),
        }
    }
}
