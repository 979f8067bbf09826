//! Notifier that writes origin-change notices to the log instead of mailing them

use async_trait::async_trait;

use sa_core::domain::value_objects::OriginDrift;
use sa_core::errors::DomainError;
use sa_core::services::Notifier;
use sa_shared::config::NotifierConfig;

/// Log-backed notifier for development and deployments without a mail relay
pub struct LogNotifier {
    config: NotifierConfig,
}

impl LogNotifier {
    /// Create a new log notifier
    pub fn new(config: NotifierConfig) -> Self {
        Self { config }
    }

    /// Subject line of the notice
    pub fn subject_line(drift: &OriginDrift) -> String {
        format!("New sign-in origin for session {}", drift.subject)
    }

    /// Body of the notice
    pub fn body(drift: &OriginDrift) -> String {
        format!(
            "Your session was refreshed from {} (previously {}). \
             If this was not you, sign in again to revoke it.",
            drift.new_origin, drift.old_origin
        )
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, drift: &OriginDrift) -> Result<(), DomainError> {
        tracing::warn!(
            from = %self.config.from,
            to = %drift.contact,
            subject = %drift.subject,
            old_origin = %drift.old_origin,
            new_origin = %drift.new_origin,
            relay = %format!("{}:{}", self.config.smtp_host, self.config.smtp_port),
            title = %Self::subject_line(drift),
            "Origin change notice"
        );
        tracing::debug!(body = %Self::body(drift), "Origin change notice body");
        Ok(())
    }
}
