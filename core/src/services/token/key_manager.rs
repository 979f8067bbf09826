//! HMAC key material for signing and verifying access tokens

use jsonwebtoken::{DecodingKey, EncodingKey};

/// Keys derived from the shared signing secret
#[derive(Clone)]
pub struct HmacKeyManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for HmacKeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKeyManager").finish_non_exhaustive()
    }
}

impl HmacKeyManager {
    /// Derive keys from `secret`
    ///
    /// Returns `None` for an empty secret; signing is then unavailable.
    pub fn from_secret(secret: &str) -> Option<Self> {
        if secret.is_empty() {
            return None;
        }
        Some(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}
