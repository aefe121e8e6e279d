/// Health check endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{app::AppState, error::Envelope};

/// Health status of the service and its backing stores
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
    pub cache: bool,
}

/// GET /health
///
/// Returns 200 when both Postgres and the session cache respond, 503
/// otherwise. The body always carries the per-store details.
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<Envelope<HealthStatus>>) {
    let database = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    let cache = state.sessions.ping().await.unwrap_or(false);

    let healthy = database && cache;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    if !healthy {
        tracing::warn!(database, cache, "Health check failed");
    }

    (
        status,
        Json(Envelope::success(HealthStatus {
            status: if healthy { "ok" } else { "degraded" },
            database,
            cache,
        })),
    )
}
