pub mod estimates;
pub mod health;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Estimation pipeline entry points
        .route("/estimates/text", post(estimates::estimate_from_text))
        .route("/estimates/photo", post(estimates::estimate_from_photo))
        // Persisted estimates and exports
        .route("/estimates/:estimate_id", get(estimates::get_estimate))
        .route(
            "/estimates/:estimate_id/export/csv",
            get(estimates::export_estimate_csv),
        )
        .route(
            "/estimates/:estimate_id/export/html",
            get(estimates::export_estimate_html),
        )
}
