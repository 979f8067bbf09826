//! Refresh token issuance and single-use rotation

use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::entities::token::{SessionTokenRecord, TokenPair};
use crate::domain::value_objects::OriginDrift;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, TokenTransaction};
use crate::services::notification::Notifier;
use crate::services::token::{TokenAuthority, TokenServiceConfig};

/// Coordinates the token authority, the store and the notifier
///
/// Each subject owns at most one live refresh secret. Redeeming it consumes
/// it and hands out a fresh pair; the read-verify-replace sequence runs in a
/// single store transaction so a secret can only be redeemed once.
pub struct RotationCoordinator<S, A, N>
where
    S: TokenRepository + ?Sized,
    A: TokenAuthority + ?Sized + 'static,
    N: Notifier + ?Sized,
{
    /// Session record store
    store: Arc<S>,
    /// Token minting and hashing
    authority: Arc<A>,
    /// Sink for origin-change notices
    notifier: Arc<N>,
    /// Service configuration
    config: TokenServiceConfig,
}

impl<S, A, N> RotationCoordinator<S, A, N>
where
    S: TokenRepository + ?Sized,
    A: TokenAuthority + ?Sized + 'static,
    N: Notifier + ?Sized,
{
    /// Create a new rotation coordinator
    pub fn new(
        store: Arc<S>,
        authority: Arc<A>,
        notifier: Arc<N>,
        config: TokenServiceConfig,
    ) -> Self {
        Self {
            store,
            authority,
            notifier,
            config,
        }
    }

    /// Get the service configuration
    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issue a fresh token pair for `subject`
    ///
    /// Any existing record for the subject is overwritten, which invalidates
    /// its refresh secret. Nothing is persisted unless minting and hashing
    /// both succeed.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Access token plus the raw refresh secret
    /// * `Err(DomainError)` - Signing, entropy, hashing or store failure
    pub async fn issue_tokens(
        &self,
        subject: &str,
        contact: &str,
        origin: &str,
    ) -> DomainResult<TokenPair> {
        if subject.is_empty() {
            return Err(DomainError::Validation {
                message: "subject must not be empty".to_string(),
            });
        }

        let access_token = self
            .authority
            .mint_access_token(subject, self.config.access_ttl)?;
        let refresh_secret = self.authority.mint_refresh_secret()?;
        let secret_hash = self.hash_secret(refresh_secret.clone()).await?;

        let record = SessionTokenRecord::new(subject, contact, origin, secret_hash);
        self.bounded(self.store.save(record)).await?;

        info!(subject, origin, "Issued token pair");
        Ok(TokenPair::new(
            access_token,
            refresh_secret,
            self.config.access_ttl,
        ))
    }

    /// Redeem `presented_secret` for `subject` and rotate it
    ///
    /// An unknown subject and a wrong secret both fail with
    /// [`TokenError::TokenNotFound`]. A secret older than the refresh TTL is
    /// deleted and fails with [`TokenError::TokenExpired`]. A different
    /// `origin` than the one on record raises a notice once the transaction
    /// has finished; it never changes the outcome.
    pub async fn refresh_tokens(
        &self,
        subject: &str,
        origin: &str,
        presented_secret: &str,
    ) -> DomainResult<TokenPair> {
        let mut drift = None;
        let result = self
            .bounded(self.rotate(subject, origin, presented_secret, &mut drift))
            .await;

        if let Some(drift) = drift {
            self.notify_drift(drift).await;
        }

        match &result {
            Ok(_) => info!(subject, origin, "Rotated refresh token"),
            Err(DomainError::Token(TokenError::TokenNotFound)) => {
                warn!(subject, origin, "Rejected refresh: unknown or consumed secret")
            }
            Err(DomainError::Token(TokenError::TokenExpired)) => {
                info!(subject, "Rejected refresh: secret expired, record deleted")
            }
            Err(e) => warn!(subject, error = %e, "Refresh failed"),
        }

        result
    }

    async fn rotate(
        &self,
        subject: &str,
        origin: &str,
        presented_secret: &str,
        drift: &mut Option<OriginDrift>,
    ) -> DomainResult<TokenPair> {
        let mut tx = self.store.begin().await?;

        let record = match tx.find_for_update(subject).await? {
            Some(record) => record,
            None => {
                release(&mut tx).await;
                return Err(TokenError::TokenNotFound.into());
            }
        };

        *drift = OriginDrift::detect(&record, origin);

        let matches = self
            .verify_secret(presented_secret.to_string(), record.secret_hash.clone())
            .await?;
        if !matches {
            release(&mut tx).await;
            return Err(TokenError::TokenNotFound.into());
        }

        if record.is_expired(self.config.refresh_ttl, Utc::now()) {
            tx.delete(subject).await?;
            tx.commit().await?;
            return Err(TokenError::TokenExpired.into());
        }

        let refresh_secret = self.authority.mint_refresh_secret()?;
        let access_token = self
            .authority
            .mint_access_token(subject, self.config.access_ttl)?;
        let secret_hash = self.hash_secret(refresh_secret.clone()).await?;

        // Any failure past this point drops `tx`, which rolls back
        tx.replace(record.rotated(secret_hash)).await?;
        tx.commit().await?;

        Ok(TokenPair::new(
            access_token,
            refresh_secret,
            self.config.access_ttl,
        ))
    }

    async fn notify_drift(&self, drift: OriginDrift) {
        warn!(
            subject = %drift.subject,
            old_origin = %drift.old_origin,
            new_origin = %drift.new_origin,
            "Refresh token redeemed from a different origin"
        );

        match timeout(self.config.notify_timeout, self.notifier.notify(&drift)).await {
            Ok(Ok(())) => debug!(subject = %drift.subject, "Origin change notice sent"),
            Ok(Err(e)) => warn!(
                subject = %drift.subject,
                error = %e,
                "Failed to send origin change notice"
            ),
            Err(_) => warn!(
                subject = %drift.subject,
                timeout_ms = self.config.notify_timeout.as_millis() as u64,
                "Origin change notice timed out"
            ),
        }
    }

    /// Run store work under the configured time bound
    async fn bounded<T, F>(&self, work: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        timeout(self.config.store_timeout, work)
            .await
            .map_err(|_| DomainError::store("store operation timed out"))?
    }

    async fn hash_secret(&self, secret: String) -> DomainResult<String> {
        let authority = Arc::clone(&self.authority);
        tokio::task::spawn_blocking(move || authority.hash_secret(&secret))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("hashing task failed: {}", e),
            })?
    }

    async fn verify_secret(&self, candidate: String, stored_hash: String) -> DomainResult<bool> {
        let authority = Arc::clone(&self.authority);
        tokio::task::spawn_blocking(move || authority.verify_secret(&candidate, &stored_hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("verification task failed: {}", e),
            })
    }
}

/// Roll back a transaction that made no writes
async fn release(tx: &mut Box<dyn TokenTransaction>) {
    if let Err(e) = tx.rollback().await {
        debug!(error = %e, "Rollback of read-only transaction failed");
    }
}
