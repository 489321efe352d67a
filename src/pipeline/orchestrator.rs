//! Estimation orchestrator.
//!
//! Drives per-item catalog matching and costing over a list of work items.
//! Items are processed strictly sequentially: the catalog search service has
//! a limited rate quota, and awaiting each search before starting the next
//! bounds the in-flight load to one search per estimate request.

use tracing::{debug, warn};

use crate::domain::{
    get_lang_config, AlternativeMatch, CostResult, MatchedLine, WorkItem, NO_MATCH_MESSAGE,
};
use crate::services::{calculate_costs, RateCatalog};

/// Candidates requested per item: one best match plus up to two alternatives.
const SEARCH_TOP_N: usize = 3;

/// Match and cost every work item.
///
/// The returned list has the same length and order as the input. A failure
/// on one item never affects its neighbours, and the function never fails
/// for a normal (even fully-unmatched) input.
pub async fn estimate_works(
    catalog: &dyn RateCatalog,
    works: &[WorkItem],
    language: &str,
) -> Vec<CostResult> {
    let search_lang = get_lang_config(language).search_lang;

    let mut results = Vec::with_capacity(works.len());
    for work in works {
        results.push(estimate_one(catalog, work, search_lang).await);
    }

    debug!(
        total = results.len(),
        matched = results.iter().filter(|r| r.is_matched()).count(),
        "Estimation batch complete"
    );

    results
}

async fn estimate_one(
    catalog: &dyn RateCatalog,
    work: &WorkItem,
    search_lang: &str,
) -> CostResult {
    let matches = match catalog.full_search(&work.name, search_lang, SEARCH_TOP_N).await {
        Ok(matches) => matches,
        Err(e) => {
            warn!(work = %work.name, error = %e, "Catalog search failed for item");
            return CostResult::unmatched(work, e.to_string());
        }
    };

    let Some(best) = matches.first() else {
        return CostResult::unmatched(work, NO_MATCH_MESSAGE);
    };

    let costs = calculate_costs(work, best);
    let alternatives: Vec<AlternativeMatch> =
        matches.iter().skip(1).take(2).map(Into::into).collect();

    CostResult::Matched(MatchedLine {
        work_name: work.name.clone(),
        quantity: work.quantity,
        unit: work.unit.clone(),
        room: work.room.clone(),
        rate_code: costs.rate_code,
        rate_name: costs.rate_name,
        unit_cost: costs.unit_cost,
        total_cost: costs.total_cost,
        labor: costs.labor,
        materials: costs.materials,
        machines: costs.machines,
        labor_hours: costs.labor_hours,
        alternatives,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::CatalogMatch;
    use crate::services::CatalogError;

    /// Catalog double scripted per work name. Unknown names error out.
    struct ScriptedCatalog {
        responses: HashMap<String, Result<Vec<CatalogMatch>, String>>,
    }

    #[async_trait]
    impl RateCatalog for ScriptedCatalog {
        async fn full_search(
            &self,
            work_name: &str,
            _search_lang: &str,
            top_n: usize,
        ) -> Result<Vec<CatalogMatch>, CatalogError> {
            match self.responses.get(work_name) {
                Some(Ok(matches)) => {
                    let mut matches = matches.clone();
                    matches.truncate(top_n);
                    Ok(matches)
                }
                Some(Err(message)) => Err(CatalogError::Search(message.clone())),
                None => Err(CatalogError::Unavailable("unscripted work name".into())),
            }
        }
    }

    fn work(name: &str, quantity: f64) -> WorkItem {
        WorkItem {
            name: name.to_string(),
            quantity,
            unit: "m²".to_string(),
            room: "Room 1".to_string(),
        }
    }

    fn rate(code: &str, name: &str, similarity: f64, unit_cost: f64) -> CatalogMatch {
        CatalogMatch {
            rate_code: code.to_string(),
            rate_name: name.to_string(),
            similarity,
            unit_cost,
            labor_per_unit: unit_cost * 0.4,
            materials_per_unit: unit_cost * 0.5,
            machines_per_unit: unit_cost * 0.1,
            labor_hours_per_unit: 0.5,
        }
    }

    #[tokio::test]
    async fn matched_item_is_priced_from_best_candidate() {
        let catalog = ScriptedCatalog {
            responses: HashMap::from([(
                "Concrete wall".to_string(),
                Ok(vec![
                    rate("12.34.056", "Concrete wall, cast-in-place", 0.95, 50.0),
                    rate("12.34.057", "Concrete wall, precast", 0.80, 70.0),
                    rate("12.35.001", "Concrete column", 0.60, 90.0),
                ]),
            )]),
        };

        let results = estimate_works(&catalog, &[work("Concrete wall", 10.0)], "EN").await;

        assert_eq!(results.len(), 1);
        match &results[0] {
            CostResult::Matched(line) => {
                assert_eq!(line.rate_code, "12.34.056");
                assert_eq!(line.total_cost, 500.0);
                assert_eq!(line.room, "Room 1");
                assert_eq!(line.alternatives.len(), 2);
                assert_eq!(line.alternatives[0].rate_code, "12.34.057");
            }
            CostResult::Unmatched(line) => panic!("expected match, got error: {}", line.error),
        }
    }

    #[tokio::test]
    async fn empty_candidate_list_yields_fixed_no_match_message() {
        let catalog = ScriptedCatalog {
            responses: HashMap::from([("Unknown work".to_string(), Ok(vec![]))]),
        };

        let results = estimate_works(&catalog, &[work("Unknown work", 1.0)], "EN").await;

        match &results[0] {
            CostResult::Unmatched(line) => {
                assert_eq!(line.error, "No matching CWICR rate found");
                assert_eq!(line.quantity, 1.0);
            }
            CostResult::Matched(_) => panic!("expected unmatched"),
        }
    }

    #[tokio::test]
    async fn search_failure_preserves_underlying_message() {
        let catalog = ScriptedCatalog {
            responses: HashMap::from([(
                "Flaky work".to_string(),
                Err("index temporarily offline".to_string()),
            )]),
        };

        let results = estimate_works(&catalog, &[work("Flaky work", 2.0)], "EN").await;

        match &results[0] {
            CostResult::Unmatched(line) => {
                assert!(line.error.contains("index temporarily offline"));
            }
            CostResult::Matched(_) => panic!("expected unmatched"),
        }
    }

    #[tokio::test]
    async fn failures_do_not_reorder_or_drop_positions() {
        let catalog = ScriptedCatalog {
            responses: HashMap::from([
                (
                    "First".to_string(),
                    Ok(vec![rate("01.01.001", "First rate", 0.9, 10.0)]),
                ),
                ("Second".to_string(), Err("search exploded".to_string())),
                ("Third".to_string(), Ok(vec![])),
                (
                    "Fourth".to_string(),
                    Ok(vec![rate("02.02.002", "Fourth rate", 0.8, 5.0)]),
                ),
            ]),
        };

        let works = vec![
            work("First", 1.0),
            work("Second", 1.0),
            work("Third", 1.0),
            work("Fourth", 2.0),
        ];
        let results = estimate_works(&catalog, &works, "EN").await;

        assert_eq!(results.len(), works.len());
        for (result, source) in results.iter().zip(&works) {
            assert_eq!(result.work_name(), source.name);
        }
        assert!(results[0].is_matched());
        assert!(!results[1].is_matched());
        assert!(!results[2].is_matched());
        assert!(results[3].is_matched());
    }

    #[tokio::test]
    async fn single_candidate_has_no_alternatives() {
        let catalog = ScriptedCatalog {
            responses: HashMap::from([(
                "Lonely".to_string(),
                Ok(vec![rate("03.03.003", "Only rate", 0.7, 8.0)]),
            )]),
        };

        let results = estimate_works(&catalog, &[work("Lonely", 1.0)], "EN").await;

        match &results[0] {
            CostResult::Matched(line) => assert!(line.alternatives.is_empty()),
            CostResult::Unmatched(_) => panic!("expected match"),
        }
    }
}
