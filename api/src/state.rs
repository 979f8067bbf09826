//! Application state shared by all workers

use std::sync::Arc;

use sa_core::errors::DomainError;
use sa_core::repositories::TokenRepository;
use sa_core::services::{JwtTokenAuthority, Notifier, RotationCoordinator, TokenServiceConfig};
use sa_infra::database::DatabasePool;
use sa_shared::config::{AuthConfig, SessionConfig};

/// Coordinator wired with runtime-selected store and notifier
pub type Coordinator = RotationCoordinator<dyn TokenRepository, JwtTokenAuthority, dyn Notifier>;

/// Application state that holds shared services
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub session: SessionConfig,
    /// MySQL pool backing the store, absent for the in-memory backend
    pub database: Option<DatabasePool>,
}

impl AppState {
    /// Build the coordinator from the auth configuration
    pub fn new(
        store: Arc<dyn TokenRepository>,
        notifier: Arc<dyn Notifier>,
        auth: &AuthConfig,
    ) -> Result<Self, DomainError> {
        let config = TokenServiceConfig::from_jwt_config(&auth.jwt)?;
        let authority = Arc::new(JwtTokenAuthority::new(&config));

        Ok(Self {
            coordinator: Arc::new(RotationCoordinator::new(store, authority, notifier, config)),
            session: auth.session.clone(),
            database: None,
        })
    }

    /// Attach the pool so `/health` can probe it
    pub fn with_database(mut self, pool: DatabasePool) -> Self {
        self.database = Some(pool);
        self
    }

    /// Lifetime of the refresh cookie, in seconds
    pub fn refresh_cookie_max_age(&self) -> i64 {
        i64::try_from(self.coordinator.config().refresh_ttl.as_secs()).unwrap_or(i64::MAX)
    }
}
