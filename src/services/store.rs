//! Estimate store adapter.
//!
//! Insert-only persistence for estimate records. The pipeline sees only the
//! [`EstimateStore`] port; the Postgres implementation keeps the result list
//! and summary as `jsonb` columns on a single row.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CostResult, Estimate, EstimateSource, EstimateSummary, NewEstimate};

/// Port for estimate persistence.
#[async_trait]
pub trait EstimateStore: Send + Sync {
    /// Insert a new estimate and return its assigned id.
    async fn save(&self, estimate: &NewEstimate) -> Result<Uuid>;

    /// Fetch a persisted estimate by id.
    async fn get(&self, id: Uuid) -> Result<Option<Estimate>>;
}

/// Postgres-backed estimate store.
#[derive(Clone)]
pub struct PgEstimateStore {
    pool: PgPool,
}

impl PgEstimateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EstimateRow {
    id: Uuid,
    source: String,
    query_text: Option<String>,
    photo_url: Option<String>,
    language: String,
    items: serde_json::Value,
    summary: serde_json::Value,
    currency_symbol: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<EstimateRow> for Estimate {
    type Error = anyhow::Error;

    fn try_from(row: EstimateRow) -> Result<Self> {
        let source = match row.source.as_str() {
            "photo" => EstimateSource::Photo,
            _ => EstimateSource::Web,
        };
        let items: Vec<CostResult> =
            serde_json::from_value(row.items).context("Invalid items column")?;
        let summary: EstimateSummary =
            serde_json::from_value(row.summary).context("Invalid summary column")?;

        Ok(Estimate {
            id: row.id,
            source,
            query_text: row.query_text,
            photo_url: row.photo_url,
            language: row.language,
            items,
            summary,
            currency_symbol: row.currency_symbol,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl EstimateStore for PgEstimateStore {
    async fn save(&self, estimate: &NewEstimate) -> Result<Uuid> {
        let items = serde_json::to_value(&estimate.items).context("Failed to encode items")?;
        let summary =
            serde_json::to_value(&estimate.summary).context("Failed to encode summary")?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO estimates
                (source, query_text, photo_url, language, items, summary, currency_symbol)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(estimate.source.to_string())
        .bind(&estimate.query_text)
        .bind(&estimate.photo_url)
        .bind(&estimate.language)
        .bind(items)
        .bind(summary)
        .bind(&estimate.currency_symbol)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert estimate")?;

        tracing::debug!(estimate_id = %id, "Estimate persisted");

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Estimate>> {
        let row = sqlx::query_as::<_, EstimateRow>(
            r#"
            SELECT id, source, query_text, photo_url, language,
                   items, summary, currency_symbol, created_at
            FROM estimates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch estimate")?;

        row.map(Estimate::try_from).transpose()
    }
}
