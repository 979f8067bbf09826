//! Simple auth server binary

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use sa_api::{create_app, telemetry, AppState};
use sa_core::repositories::{InMemoryTokenRepository, TokenRepository};
use sa_core::services::Notifier;
use sa_infra::database::{DatabasePool, MySqlTokenRepository};
use sa_infra::LogNotifier;
use sa_shared::config::{AppConfig, StorageBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    telemetry::init(&config.logging);

    info!(environment = %config.environment, "Starting simple auth server");
    if config.auth.jwt.is_using_default_secret() {
        warn!("Using the development signing secret; set SA_AUTH__JWT__SECRET");
    }

    let mut pool: Option<DatabasePool> = None;
    let store: Arc<dyn TokenRepository> = match config.database.backend {
        StorageBackend::Mysql => {
            let db = DatabasePool::new(&config.database)
                .await
                .context("Failed to connect to database")?;
            if config.database.run_migrations {
                db.run_migrations()
                    .await
                    .context("Failed to run database migrations")?;
            }
            let repo = MySqlTokenRepository::new(db.get_pool().clone());
            pool = Some(db);
            Arc::new(repo)
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory token store; sessions are lost on restart");
            Arc::new(InMemoryTokenRepository::new())
        }
    };

    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier::new(config.notifier.clone()));
    let mut state =
        AppState::new(store, notifier, &config.auth).context("Invalid token configuration")?;
    if let Some(db) = &pool {
        info!(stats = %db.get_statistics(), "Database pool ready");
        state = state.with_database(db.clone());
    }
    let state = web::Data::new(state);

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(state.clone()))
        .keep_alive(Duration::from_secs(config.server.keep_alive))
        .client_request_timeout(Duration::from_secs(config.server.request_timeout))
        .shutdown_timeout(config.server.shutdown_timeout);
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server terminated with an error")?;

    if let Some(pool) = pool {
        info!(stats = %pool.get_statistics(), "Closing database pool");
        pool.close().await;
    }
    info!("Server stopped");
    Ok(())
}
