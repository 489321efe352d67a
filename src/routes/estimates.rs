//! Estimate routes
//!
//! Pipeline entry points plus fetch/export of persisted estimates.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::domain::{CostResult, Estimate, EstimateSummary, WorkItem};
use crate::error::ApiError;
use crate::pipeline::export::{export_csv, export_html};
use crate::pipeline::EstimateOutcome;

/// Request body for text estimation.
#[derive(Debug, Deserialize)]
pub struct TextEstimateRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Request body for photo estimation.
///
/// `photo_url` is the caller's stored reference to the uploaded image; it is
/// kept on the persisted estimate record.
#[derive(Debug, Deserialize)]
pub struct PhotoEstimateRequest {
    pub image_base64: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

fn default_language() -> String {
    "EN".to_string()
}

/// Response body for a pipeline run.
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub works: Vec<WorkItem>,
    pub results: Vec<CostResult>,
    pub summary: EstimateSummary,
}

impl From<EstimateOutcome> for EstimateResponse {
    fn from(outcome: EstimateOutcome) -> Self {
        Self {
            id: outcome.id,
            works: outcome.works,
            results: outcome.results,
            summary: outcome.summary,
        }
    }
}

/// POST /estimates/text
///
/// Run the estimation pipeline over a free-text work description.
pub async fn estimate_from_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextEstimateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }

    let outcome = state
        .pipeline
        .estimate_from_text(&request.text, &request.language)
        .await?;

    Ok(Json(EstimateResponse::from(outcome)))
}

/// POST /estimates/photo
///
/// Run the estimation pipeline over a photograph of construction work.
pub async fn estimate_from_photo(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PhotoEstimateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.image_base64.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "image_base64 must not be empty".to_string(),
        ));
    }

    let outcome = state
        .pipeline
        .estimate_from_photo(
            &request.image_base64,
            &request.language,
            request.photo_url.as_deref(),
        )
        .await?;

    Ok(Json(EstimateResponse::from(outcome)))
}

/// GET /estimates/:estimate_id
pub async fn get_estimate(
    State(state): State<Arc<AppState>>,
    Path(estimate_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let estimate = load_estimate(&state, estimate_id).await?;
    Ok(DataResponse::new(estimate))
}

/// GET /estimates/:estimate_id/export/csv
pub async fn export_estimate_csv(
    State(state): State<Arc<AppState>>,
    Path(estimate_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let estimate = load_estimate(&state, estimate_id).await?;
    let csv = export_csv(&estimate.items);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(disposition) = HeaderValue::from_str(&format!(
        "attachment; filename=\"estimate-{estimate_id}.csv\""
    )) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    Ok((headers, csv))
}

/// GET /estimates/:estimate_id/export/html
pub async fn export_estimate_html(
    State(state): State<Arc<AppState>>,
    Path(estimate_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let estimate = load_estimate(&state, estimate_id).await?;
    let html = export_html(&estimate.items, &estimate.summary, &estimate.language);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    Ok((headers, html))
}

async fn load_estimate(state: &AppState, estimate_id: Uuid) -> Result<Estimate, ApiError> {
    use crate::services::EstimateStore;

    state
        .store
        .get(estimate_id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound(format!("Estimate {estimate_id} not found")))
}
