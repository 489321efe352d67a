//! Pipeline facade.
//!
//! Composes extractor → orchestrator → aggregator → store into the two
//! entry points: estimate from text and estimate from photo.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    get_lang_config, CostResult, EstimateSource, EstimateSummary, NewEstimate, WorkItem,
};
use crate::pipeline::{aggregate_results, estimate_works};
use crate::services::{EstimateStore, ExtractionError, RateCatalog, WorkExtractor};

/// Request-level pipeline failure. Everything below the orchestrator
/// boundary is captured as data, so only extraction problems surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("no work items recognized in the text")]
    NothingRecognized,
}

/// Output of one pipeline run.
///
/// `id` is `None` when persistence failed; the estimate itself is still
/// returned.
#[derive(Debug, Clone)]
pub struct EstimateOutcome {
    pub id: Option<Uuid>,
    pub works: Vec<WorkItem>,
    pub results: Vec<CostResult>,
    pub summary: EstimateSummary,
}

/// The cost-estimation pipeline, wired to its three collaborators.
#[derive(Clone)]
pub struct EstimatePipeline {
    extractor: Arc<dyn WorkExtractor>,
    catalog: Arc<dyn RateCatalog>,
    store: Arc<dyn EstimateStore>,
}

impl EstimatePipeline {
    pub fn new(
        extractor: Arc<dyn WorkExtractor>,
        catalog: Arc<dyn RateCatalog>,
        store: Arc<dyn EstimateStore>,
    ) -> Self {
        Self {
            extractor,
            catalog,
            store,
        }
    }

    /// Estimate from a free-text description.
    ///
    /// An empty extraction result is a failure here: a text request that
    /// yields no work items has nothing to estimate.
    pub async fn estimate_from_text(
        &self,
        text: &str,
        language: &str,
    ) -> Result<EstimateOutcome, PipelineError> {
        let works = self.extractor.parse_text(text, language).await?;
        if works.is_empty() {
            return Err(PipelineError::NothingRecognized);
        }

        self.run(
            works,
            language,
            EstimateSource::Web,
            Some(text.to_string()),
            None,
        )
        .await
    }

    /// Estimate from a photograph.
    ///
    /// An empty extraction result is valid: nothing recognized in the image
    /// yields an empty estimate. `photo_url` is the caller's stored
    /// reference to the submitted image (uploads live outside the pipeline)
    /// and is persisted on the estimate record.
    pub async fn estimate_from_photo(
        &self,
        image_base64: &str,
        language: &str,
        photo_url: Option<&str>,
    ) -> Result<EstimateOutcome, PipelineError> {
        let works = self.extractor.parse_photo(image_base64, language).await?;

        self.run(
            works,
            language,
            EstimateSource::Photo,
            None,
            photo_url.map(str::to_string),
        )
        .await
    }

    async fn run(
        &self,
        works: Vec<WorkItem>,
        language: &str,
        source: EstimateSource,
        query_text: Option<String>,
        photo_url: Option<String>,
    ) -> Result<EstimateOutcome, PipelineError> {
        let results = estimate_works(self.catalog.as_ref(), &works, language).await;
        let summary = aggregate_results(&results);

        let record = NewEstimate {
            source,
            query_text,
            photo_url,
            language: language.to_string(),
            items: results.clone(),
            summary: summary.clone(),
            currency_symbol: get_lang_config(language).sym.to_string(),
        };

        // Persistence failure is non-fatal: the computed estimate is still
        // returned, only the id is absent.
        let id = match self.store.save(&record).await {
            Ok(id) => {
                info!(estimate_id = %id, source = %source, items = summary.total_items, "Estimate saved");
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, source = %source, "Failed to persist estimate; returning unsaved result");
                None
            }
        };

        Ok(EstimateOutcome {
            id,
            works,
            results,
            summary,
        })
    }
}
