//! Structured-work extractor client.
//!
//! Talks to the AI service that turns free text or a photograph into a list
//! of structured work items. The pipeline consumes it through the
//! [`WorkExtractor`] port so tests can substitute an in-memory double.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::{WorkItem, WorkItemError};

/// Extraction failure. Fatal to the whole estimate request: without work
/// items there is nothing to price.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extractor service unavailable: {0}")]
    Unavailable(String),

    #[error("invalid extractor response: {0}")]
    InvalidResponse(String),

    #[error("extractor returned a malformed work item: {0}")]
    InvalidItem(#[from] WorkItemError),
}

/// Port for the structured-work extractor.
///
/// `parse_photo` may legitimately return an empty list (nothing recognized
/// in the image); an empty `parse_text` result is treated as a request
/// failure by the facade.
#[async_trait]
pub trait WorkExtractor: Send + Sync {
    async fn parse_text(&self, text: &str, language: &str)
        -> Result<Vec<WorkItem>, ExtractionError>;

    async fn parse_photo(
        &self,
        image_base64: &str,
        language: &str,
    ) -> Result<Vec<WorkItem>, ExtractionError>;
}

/// HTTP client for the extractor AI service.
#[derive(Clone)]
pub struct HttpWorkExtractor {
    client: Client,
    base_url: String,
    token: String,
}

/// Error response body from the extractor service.
#[derive(Debug, Deserialize)]
struct ExtractorErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    works: Vec<WorkItem>,
}

impl HttpWorkExtractor {
    pub fn new(base_url: &str, token: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, "Work extractor client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Check extractor service health.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);

        self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Extractor service health check failed")?
            .error_for_status()
            .context("Extractor service unhealthy")?;

        Ok(())
    }

    async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ExtractionError> {
        let url = format!("{}{}", self.base_url, path);

        debug!(url = %url, "Extractor service request");

        let response = self
            .client
            .post(&url)
            .header("X-Internal-Token", &self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Extractor service request failed");
                ExtractionError::Unavailable(e.to_string())
            })?;

        let status = response.status();

        if status.is_success() {
            response.json::<R>().await.map_err(|e| {
                error!(error = %e, "Failed to parse extractor response");
                ExtractionError::InvalidResponse(e.to_string())
            })
        } else {
            let message = response
                .json::<ExtractorErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("extractor service error: {status}"));

            if status == StatusCode::UNAUTHORIZED {
                error!("Extractor service authentication failed");
            }
            Err(ExtractionError::Unavailable(message))
        }
    }

    /// Enforce the extraction contract on every returned item.
    fn validated(works: Vec<WorkItem>) -> Result<Vec<WorkItem>, ExtractionError> {
        for work in &works {
            work.validate()?;
        }
        Ok(works)
    }
}

#[async_trait]
impl WorkExtractor for HttpWorkExtractor {
    async fn parse_text(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Vec<WorkItem>, ExtractionError> {
        #[derive(Serialize)]
        struct Request<'a> {
            text: &'a str,
            language: &'a str,
        }

        let response: ParseResponse = self
            .post("/v1/parse/text", &Request { text, language })
            .await?;

        Self::validated(response.works)
    }

    async fn parse_photo(
        &self,
        image_base64: &str,
        language: &str,
    ) -> Result<Vec<WorkItem>, ExtractionError> {
        #[derive(Serialize)]
        struct Request<'a> {
            image_base64: &'a str,
            language: &'a str,
        }

        let response: ParseResponse = self
            .post(
                "/v1/parse/photo",
                &Request {
                    image_base64,
                    language,
                },
            )
            .await?;

        Self::validated(response.works)
    }
}
