//! JWT and bcrypt backed token authority

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use std::time::Duration;

use crate::domain::entities::token::{Claims, REFRESH_SECRET_BYTES};
use crate::errors::{DomainError, TokenError};

use super::authority::TokenAuthority;
use super::config::TokenServiceConfig;
use super::key_manager::HmacKeyManager;

/// Token authority signing HMAC JWTs and hashing refresh secrets with bcrypt
pub struct JwtTokenAuthority {
    keys: Option<HmacKeyManager>,
    header: Header,
    validation: Validation,
    issuer: String,
    hash_cost: u32,
}

impl JwtTokenAuthority {
    /// Creates a new token authority
    ///
    /// An empty signing secret is accepted here; minting then fails with a
    /// signing error instead.
    pub fn new(config: &TokenServiceConfig) -> Self {
        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 5;

        Self {
            keys: HmacKeyManager::from_secret(&config.jwt_secret),
            header: Header::new(config.algorithm),
            validation,
            issuer: config.issuer.clone(),
            hash_cost: config.hash_cost,
        }
    }

    fn keys(&self) -> Result<&HmacKeyManager, DomainError> {
        self.keys.as_ref().ok_or_else(|| {
            TokenError::Signing {
                message: "signing key unavailable".to_string(),
            }
            .into()
        })
    }
}

impl TokenAuthority for JwtTokenAuthority {
    fn mint_access_token(&self, subject: &str, ttl: Duration) -> Result<String, DomainError> {
        let keys = self.keys()?;
        let claims = Claims::new_access_token(subject, ttl, &self.issuer)?;
        encode(&self.header, &claims, keys.encoding_key()).map_err(|e| {
            TokenError::Signing {
                message: e.to_string(),
            }
            .into()
        })
    }

    fn mint_refresh_secret(&self) -> Result<String, DomainError> {
        let mut bytes = [0u8; REFRESH_SECRET_BYTES];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| TokenError::EntropySource {
            message: e.to_string(),
        })?;
        Ok(URL_SAFE.encode(bytes))
    }

    fn hash_secret(&self, secret: &str) -> Result<String, DomainError> {
        bcrypt::hash(secret, self.hash_cost).map_err(|e| {
            TokenError::Hashing {
                message: e.to_string(),
            }
            .into()
        })
    }

    fn verify_secret(&self, candidate: &str, stored_hash: &str) -> bool {
        // Malformed hashes count as a mismatch
        bcrypt::verify(candidate, stored_hash).unwrap_or(false)
    }

    fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let keys = self.keys()?;
        let token_data = decode::<Claims>(token, keys.decoding_key(), &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::AccessTokenExpired,
                _ => TokenError::InvalidAccessToken,
            })?;
        Ok(token_data.claims)
    }
}
