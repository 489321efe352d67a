use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::db;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub database: String,
    pub extractor_service: String,
    pub catalog_service: String,
}

/// Health check endpoint - public
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    // Check all services in parallel
    let (db_ok, extractor_result, catalog_result) = tokio::join!(
        db::health_check(&state.db),
        state.extractor.health_check(),
        state.catalog.health_check(),
    );

    let db_status = if db_ok { "ok" } else { "error" };
    let extractor_status = if extractor_result.is_ok() {
        "ok"
    } else {
        "error"
    };
    let catalog_status = if catalog_result.is_ok() { "ok" } else { "error" };

    // Determine overall status
    let status = if db_ok && extractor_result.is_ok() && catalog_result.is_ok() {
        "healthy"
    } else if db_ok {
        // DB is critical, others are degraded
        "degraded"
    } else {
        "unhealthy"
    };

    // Return 503 if unhealthy (critical service down)
    let status_code = if status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                database: db_status.to_string(),
                extractor_service: extractor_status.to_string(),
                catalog_service: catalog_status.to_string(),
            },
        }),
    )
}
