//! Out-of-band notification contract

use async_trait::async_trait;

use crate::domain::value_objects::OriginDrift;
use crate::errors::DomainError;

/// Sink for origin-change notices
///
/// Callers treat failures as advisory: they are logged and never change the
/// outcome of the operation that raised the notice.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notice that `drift.subject` redeemed from a new origin
    async fn notify(&self, drift: &OriginDrift) -> Result<(), DomainError>;
}
