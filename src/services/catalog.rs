//! CWICR rate catalog client and costing function.
//!
//! The catalog search service takes a work name and a search language and
//! returns ranked candidate rates. Matching lines are then priced locally
//! from the candidate's per-unit cost basis.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::{CatalogMatch, WorkItem};

/// Per-item catalog failure. Never fatal to the batch: the orchestrator
/// records it on the affected line and moves on.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog search unavailable: {0}")]
    Unavailable(String),

    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),

    #[error("catalog search failed: {0}")]
    Search(String),
}

/// Port for the rate catalog search service.
///
/// Returned lists are sorted descending by similarity and hold at most
/// `top_n` candidates.
#[async_trait]
pub trait RateCatalog: Send + Sync {
    async fn full_search(
        &self,
        work_name: &str,
        search_lang: &str,
        top_n: usize,
    ) -> Result<Vec<CatalogMatch>, CatalogError>;
}

/// Fully priced cost basis for one work item against one catalog match.
#[derive(Debug, Clone)]
pub struct CostBreakdown {
    pub rate_code: String,
    pub rate_name: String,
    pub unit_cost: f64,
    pub total_cost: f64,
    pub labor: f64,
    pub materials: f64,
    pub machines: f64,
    pub labor_hours: f64,
}

/// Price one work item against a catalog match.
///
/// Pure arithmetic over the match's per-unit cost basis:
/// `total_cost = unit_cost × quantity`, component totals scale the same way.
pub fn calculate_costs(work: &WorkItem, m: &CatalogMatch) -> CostBreakdown {
    CostBreakdown {
        rate_code: m.rate_code.clone(),
        rate_name: m.rate_name.clone(),
        unit_cost: m.unit_cost,
        total_cost: m.unit_cost * work.quantity,
        labor: m.labor_per_unit * work.quantity,
        materials: m.materials_per_unit * work.quantity,
        machines: m.machines_per_unit * work.quantity,
        labor_hours: m.labor_hours_per_unit * work.quantity,
    }
}

/// HTTP client for the catalog search service.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CatalogErrorResponse {
    message: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str, token: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, "Catalog client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Check catalog service health.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);

        self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Catalog service health check failed")?
            .error_for_status()
            .context("Catalog service unhealthy")?;

        Ok(())
    }
}

#[async_trait]
impl RateCatalog for HttpCatalogClient {
    async fn full_search(
        &self,
        work_name: &str,
        search_lang: &str,
        top_n: usize,
    ) -> Result<Vec<CatalogMatch>, CatalogError> {
        #[derive(Serialize)]
        struct Request<'a> {
            query: &'a str,
            lang: &'a str,
            top_n: usize,
        }

        #[derive(Deserialize)]
        struct Response {
            matches: Vec<CatalogMatch>,
        }

        let url = format!("{}/v1/search", self.base_url);

        debug!(url = %url, query = work_name, "Catalog search request");

        let response = self
            .client
            .post(&url)
            .header("X-Internal-Token", &self.token)
            .json(&Request {
                query: work_name,
                lang: search_lang,
                top_n,
            })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Catalog search request failed");
                CatalogError::Unavailable(e.to_string())
            })?;

        let status = response.status();

        if status.is_success() {
            let mut matches = response
                .json::<Response>()
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to parse catalog response");
                    CatalogError::InvalidResponse(e.to_string())
                })?
                .matches;

            // The service returns ranked results; normalize the ordering
            // locally so element 0 is always the best match.
            matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
            matches.truncate(top_n);

            Ok(matches)
        } else {
            let message = response
                .json::<CatalogErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("catalog service error: {status}"));

            if status == StatusCode::UNAUTHORIZED {
                error!("Catalog service authentication failed");
            }
            Err(CatalogError::Search(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> CatalogMatch {
        CatalogMatch {
            rate_code: "12.34.056".to_string(),
            rate_name: "Cast-in-place concrete wall".to_string(),
            similarity: 0.92,
            unit_cost: 50.0,
            labor_per_unit: 20.0,
            materials_per_unit: 25.0,
            machines_per_unit: 5.0,
            labor_hours_per_unit: 1.2,
        }
    }

    #[test]
    fn costing_scales_all_components_by_quantity() {
        let work = WorkItem {
            name: "Concrete wall".to_string(),
            quantity: 10.0,
            unit: "m²".to_string(),
            room: "Room 1".to_string(),
        };

        let costs = calculate_costs(&work, &sample_match());

        assert_eq!(costs.unit_cost, 50.0);
        assert_eq!(costs.total_cost, 500.0);
        assert_eq!(costs.labor, 200.0);
        assert_eq!(costs.materials, 250.0);
        assert_eq!(costs.machines, 50.0);
        assert_eq!(costs.labor_hours, 12.0);
    }

    #[test]
    fn costing_zero_quantity_yields_zero_totals() {
        let work = WorkItem {
            name: "Concrete wall".to_string(),
            quantity: 0.0,
            unit: "m²".to_string(),
            room: String::new(),
        };

        let costs = calculate_costs(&work, &sample_match());

        assert_eq!(costs.total_cost, 0.0);
        assert_eq!(costs.labor, 0.0);
        // Unit cost is still carried for display.
        assert_eq!(costs.unit_cost, 50.0);
    }
}
