use actix_web::{web, HttpResponse};

use crate::state::AppState;

/// Handler for GET /health
///
/// Reports 503 when the MySQL store cannot be reached.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (healthy, storage) = match &state.database {
        Some(pool) => {
            let up = match pool.health_check().await {
                Ok(up) => up,
                Err(e) => {
                    tracing::warn!(error = %e, "Health check could not reach the database");
                    false
                }
            };
            let stats = pool.get_statistics();
            let storage = serde_json::json!({
                "backend": "mysql",
                "status": if up { "up" } else { "down" },
                "connections": stats.connections,
                "idle_connections": stats.idle_connections,
                "max_connections": stats.max_connections,
            });
            (up, storage)
        }
        None => (true, serde_json::json!({ "backend": "memory", "status": "up" })),
    };

    let body = serde_json::json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "simple-auth",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
