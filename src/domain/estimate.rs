//! Estimate domain types
//!
//! Work items, catalog matches, priced cost results, and the aggregate
//! summary attached to every persisted estimate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Work items
// ============================================================================

/// One unit of requested construction work, extracted from user input.
///
/// Immutable once handed to the orchestrator; only ever persisted as part of
/// a [`CostResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub name: String,
    /// Requested quantity; extractors that omit it get 1.
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Free-form unit label (e.g. "m²", "pcs"); may be empty.
    #[serde(default)]
    pub unit: String,
    /// Optional location label; may be empty.
    #[serde(default)]
    pub room: String,
}

fn default_quantity() -> f64 {
    1.0
}

/// Canonical message for a catalog search that returned zero candidates.
pub const NO_MATCH_MESSAGE: &str = "No matching CWICR rate found";

/// Validation failure for an extracted work item.
#[derive(Debug, Error)]
pub enum WorkItemError {
    #[error("work item has an empty name")]
    EmptyName,

    #[error("work item '{0}' has a negative quantity")]
    NegativeQuantity(String),
}

impl WorkItem {
    /// Check the extraction-contract invariants: non-empty name, quantity ≥ 0.
    pub fn validate(&self) -> Result<(), WorkItemError> {
        if self.name.trim().is_empty() {
            return Err(WorkItemError::EmptyName);
        }
        if self.quantity < 0.0 {
            return Err(WorkItemError::NegativeQuantity(self.name.clone()));
        }
        Ok(())
    }
}

// ============================================================================
// Catalog matches
// ============================================================================

/// One ranked candidate rate from the CWICR catalog search.
///
/// Result lists arrive sorted descending by `similarity`; element 0 is the
/// best match. The per-unit cost basis fields are consumed only by the
/// costing function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMatch {
    /// Dotted hierarchical code, e.g. `12.34.056`.
    pub rate_code: String,
    pub rate_name: String,
    /// Ranking score, higher = better.
    pub similarity: f64,
    #[serde(default)]
    pub unit_cost: f64,
    #[serde(default)]
    pub labor_per_unit: f64,
    #[serde(default)]
    pub materials_per_unit: f64,
    #[serde(default)]
    pub machines_per_unit: f64,
    #[serde(default)]
    pub labor_hours_per_unit: f64,
}

/// Alternative catalog candidate surfaced alongside the best match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeMatch {
    pub rate_code: String,
    pub rate_name: String,
    pub similarity: f64,
}

impl From<&CatalogMatch> for AlternativeMatch {
    fn from(m: &CatalogMatch) -> Self {
        Self {
            rate_code: m.rate_code.clone(),
            rate_name: m.rate_name.clone(),
            similarity: m.similarity,
        }
    }
}

// ============================================================================
// Cost results
// ============================================================================

/// One priced (or deliberately unpriced) line in an estimate.
///
/// Modeled as a tagged variant so that exactly one of {priced fields, error}
/// exists by construction. Serializes to the flat wire shape with a
/// `matched` boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CostResultRepr", into = "CostResultRepr")]
pub enum CostResult {
    Matched(MatchedLine),
    Unmatched(UnmatchedLine),
}

/// A successfully costed line.
#[derive(Debug, Clone)]
pub struct MatchedLine {
    pub work_name: String,
    pub quantity: f64,
    pub unit: String,
    pub room: String,
    pub rate_code: String,
    pub rate_name: String,
    pub unit_cost: f64,
    pub total_cost: f64,
    pub labor: f64,
    pub materials: f64,
    pub machines: f64,
    pub labor_hours: f64,
    /// Up to 2 next-best catalog candidates.
    pub alternatives: Vec<AlternativeMatch>,
}

/// A line that could not be priced.
#[derive(Debug, Clone)]
pub struct UnmatchedLine {
    pub work_name: String,
    pub quantity: f64,
    pub unit: String,
    pub room: String,
    pub error: String,
}

impl CostResult {
    /// Build an unmatched line from its source work item.
    pub fn unmatched(work: &WorkItem, error: impl Into<String>) -> Self {
        Self::Unmatched(UnmatchedLine {
            work_name: work.name.clone(),
            quantity: work.quantity,
            unit: work.unit.clone(),
            room: work.room.clone(),
            error: error.into(),
        })
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    pub fn work_name(&self) -> &str {
        match self {
            Self::Matched(line) => &line.work_name,
            Self::Unmatched(line) => &line.work_name,
        }
    }
}

/// Flat wire representation carrying the `matched` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CostResultRepr {
    work_name: String,
    #[serde(default = "default_quantity")]
    quantity: f64,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    room: String,
    matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rate_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    labor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    materials: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    machines: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    labor_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alternatives: Vec<AlternativeMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<CostResult> for CostResultRepr {
    fn from(result: CostResult) -> Self {
        match result {
            CostResult::Matched(line) => Self {
                work_name: line.work_name,
                quantity: line.quantity,
                unit: line.unit,
                room: line.room,
                matched: true,
                rate_code: Some(line.rate_code),
                rate_name: Some(line.rate_name),
                unit_cost: Some(line.unit_cost),
                total_cost: Some(line.total_cost),
                labor: Some(line.labor),
                materials: Some(line.materials),
                machines: Some(line.machines),
                labor_hours: Some(line.labor_hours),
                alternatives: line.alternatives,
                error: None,
            },
            CostResult::Unmatched(line) => Self {
                work_name: line.work_name,
                quantity: line.quantity,
                unit: line.unit,
                room: line.room,
                matched: false,
                rate_code: None,
                rate_name: None,
                unit_cost: None,
                total_cost: None,
                labor: None,
                materials: None,
                machines: None,
                labor_hours: None,
                alternatives: Vec::new(),
                error: Some(line.error),
            },
        }
    }
}

impl From<CostResultRepr> for CostResult {
    fn from(repr: CostResultRepr) -> Self {
        if repr.matched {
            // Absent numeric fields on a matched record count as zero.
            Self::Matched(MatchedLine {
                work_name: repr.work_name,
                quantity: repr.quantity,
                unit: repr.unit,
                room: repr.room,
                rate_code: repr.rate_code.unwrap_or_default(),
                rate_name: repr.rate_name.unwrap_or_default(),
                unit_cost: repr.unit_cost.unwrap_or(0.0),
                total_cost: repr.total_cost.unwrap_or(0.0),
                labor: repr.labor.unwrap_or(0.0),
                materials: repr.materials.unwrap_or(0.0),
                machines: repr.machines.unwrap_or(0.0),
                labor_hours: repr.labor_hours.unwrap_or(0.0),
                alternatives: repr.alternatives,
            })
        } else {
            Self::Unmatched(UnmatchedLine {
                work_name: repr.work_name,
                quantity: repr.quantity,
                unit: repr.unit,
                room: repr.room,
                error: repr.error.unwrap_or_else(|| NO_MATCH_MESSAGE.to_string()),
            })
        }
    }
}

// ============================================================================
// Category codes
// ============================================================================

/// Normalized category key: the first two dot-segments of a rate code.
///
/// Rate codes without enough segments keep what they have; absent or empty
/// codes collapse to the canonical `Other` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCode(String);

impl CategoryCode {
    pub const OTHER: &'static str = "Other";

    pub fn from_rate_code(rate_code: &str) -> Self {
        let trimmed = rate_code.trim();
        if trimmed.is_empty() {
            return Self::other();
        }
        let mut segments = trimmed.split('.');
        match (segments.next(), segments.next()) {
            (Some(first), Some(second)) => Self(format!("{first}.{second}")),
            _ => Self(trimmed.to_string()),
        }
    }

    pub fn other() -> Self {
        Self(Self::OTHER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Per-category cost breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub code: CategoryCode,
    pub total: f64,
    pub count: usize,
    /// Integer share of the grand total; 0 when the grand total is 0.
    pub percentage: u32,
}

/// Aggregate over a list of cost results.
///
/// Derived, never persisted independently; always recomputed from the result
/// list and attached to an estimate at save time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateSummary {
    pub total_cost: f64,
    pub labor_total: f64,
    pub materials_total: f64,
    pub machines_total: f64,
    pub labor_hours_total: f64,
    pub matched_count: usize,
    pub unmatched_count: usize,
    pub total_items: usize,
    pub categories: Vec<CategoryBreakdown>,
}

// ============================================================================
// Estimates
// ============================================================================

/// Where the estimate request originated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    Web,
    Photo,
}

impl std::fmt::Display for EstimateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimateSource::Web => write!(f, "web"),
            EstimateSource::Photo => write!(f, "photo"),
        }
    }
}

/// A new estimate record, handed to the store for insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEstimate {
    pub source: EstimateSource,
    pub query_text: Option<String>,
    pub photo_url: Option<String>,
    pub language: String,
    pub items: Vec<CostResult>,
    pub summary: EstimateSummary,
    pub currency_symbol: String,
}

/// A persisted estimate. Insert-only; re-estimating produces a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    pub id: Uuid,
    pub source: EstimateSource,
    pub query_text: Option<String>,
    pub photo_url: Option<String>,
    pub language: String,
    pub items: Vec<CostResult>,
    pub summary: EstimateSummary,
    pub currency_symbol: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_defaults_to_one() {
        let item: WorkItem = serde_json::from_str(r#"{"name": "Paint ceiling"}"#).unwrap();
        assert_eq!(item.quantity, 1.0);
        assert!(item.unit.is_empty());
        assert!(item.validate().is_ok());
    }

    #[test]
    fn validation_rejects_empty_name_and_negative_quantity() {
        let unnamed = WorkItem {
            name: "  ".to_string(),
            quantity: 1.0,
            unit: String::new(),
            room: String::new(),
        };
        assert!(matches!(unnamed.validate(), Err(WorkItemError::EmptyName)));

        let negative = WorkItem {
            name: "Demolition".to_string(),
            quantity: -2.0,
            unit: "m²".to_string(),
            room: String::new(),
        };
        assert!(matches!(
            negative.validate(),
            Err(WorkItemError::NegativeQuantity(_))
        ));
    }

    #[test]
    fn category_code_takes_first_two_segments() {
        assert_eq!(CategoryCode::from_rate_code("12.34.056").as_str(), "12.34");
        assert_eq!(CategoryCode::from_rate_code("12.34").as_str(), "12.34");
        assert_eq!(CategoryCode::from_rate_code("12").as_str(), "12");
        assert_eq!(CategoryCode::from_rate_code("").as_str(), "Other");
        assert_eq!(CategoryCode::from_rate_code("  ").as_str(), "Other");
    }

    #[test]
    fn cost_result_serializes_with_matched_flag() {
        let result = CostResult::Matched(MatchedLine {
            work_name: "Concrete wall".to_string(),
            quantity: 10.0,
            unit: "m²".to_string(),
            room: "Room 1".to_string(),
            rate_code: "12.34.056".to_string(),
            rate_name: "Cast-in-place concrete wall".to_string(),
            unit_cost: 50.0,
            total_cost: 500.0,
            labor: 200.0,
            materials: 250.0,
            machines: 50.0,
            labor_hours: 12.0,
            alternatives: Vec::new(),
        });

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["matched"], true);
        assert_eq!(value["total_cost"], 500.0);
        assert!(value.get("error").is_none());

        let back: CostResult = serde_json::from_value(value).unwrap();
        assert!(back.is_matched());
    }

    #[test]
    fn unmatched_result_round_trips_error_message() {
        let work = WorkItem {
            name: "Mystery work".to_string(),
            quantity: 3.0,
            unit: "pcs".to_string(),
            room: String::new(),
        };
        let result = CostResult::unmatched(&work, "No matching CWICR rate found");

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["matched"], false);
        assert_eq!(value["error"], "No matching CWICR rate found");
        assert!(value.get("rate_code").is_none());

        let back: CostResult = serde_json::from_value(value).unwrap();
        match back {
            CostResult::Unmatched(line) => {
                assert_eq!(line.error, "No matching CWICR rate found");
                assert_eq!(line.quantity, 3.0);
            }
            CostResult::Matched(_) => panic!("expected unmatched"),
        }
    }

    #[test]
    fn unmatched_record_without_error_falls_back_to_canonical_message() {
        let back: CostResult = serde_json::from_str(
            r#"{"work_name": "Mystery work", "quantity": 1, "matched": false}"#,
        )
        .unwrap();

        match back {
            CostResult::Unmatched(line) => assert_eq!(line.error, NO_MATCH_MESSAGE),
            CostResult::Matched(_) => panic!("expected unmatched"),
        }
    }
}
