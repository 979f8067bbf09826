//! Token Authority contract

use std::time::Duration;

use crate::domain::entities::token::Claims;
use crate::errors::DomainError;

/// Stateless minting and verification of tokens and refresh secrets
///
/// Implementations never log or persist raw tokens or secrets. All methods
/// are pure and may be called concurrently.
pub trait TokenAuthority: Send + Sync {
    /// Signed access token for `subject`, expiring `ttl` from now
    fn mint_access_token(&self, subject: &str, ttl: Duration) -> Result<String, DomainError>;

    /// URL-safe random refresh secret with at least 256 bits of entropy
    fn mint_refresh_secret(&self) -> Result<String, DomainError>;

    /// Salted, slow, one-way hash of a refresh secret
    fn hash_secret(&self, secret: &str) -> Result<String, DomainError>;

    /// Whether `candidate` matches `stored_hash`. Never fails.
    fn verify_secret(&self, candidate: &str, stored_hash: &str) -> bool;

    /// Decode and validate an access token minted by this authority
    fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError>;
}
