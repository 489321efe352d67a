//! Result aggregation.
//!
//! Pure reduction of a cost-result list into the summary totals and
//! per-category breakdown attached to every estimate.

use crate::domain::{CategoryBreakdown, CategoryCode, CostResult, EstimateSummary};

/// Category accumulator, kept in first-seen order.
struct CategoryAcc {
    code: CategoryCode,
    total: f64,
    count: usize,
}

/// Reduce a list of cost results into an [`EstimateSummary`].
///
/// Sums run over matched results only; categories group by the first two
/// dot-segments of the rate code. An empty input yields an all-zero summary
/// with no categories.
pub fn aggregate_results(results: &[CostResult]) -> EstimateSummary {
    let mut total_cost = 0.0;
    let mut labor_total = 0.0;
    let mut materials_total = 0.0;
    let mut machines_total = 0.0;
    let mut labor_hours_total = 0.0;
    let mut matched_count = 0;
    let mut unmatched_count = 0;
    let mut buckets: Vec<CategoryAcc> = Vec::new();

    for result in results {
        match result {
            CostResult::Matched(line) => {
                matched_count += 1;
                total_cost += line.total_cost;
                labor_total += line.labor;
                materials_total += line.materials;
                machines_total += line.machines;
                labor_hours_total += line.labor_hours;

                let code = CategoryCode::from_rate_code(&line.rate_code);
                match buckets.iter_mut().find(|b| b.code == code) {
                    Some(bucket) => {
                        bucket.total += line.total_cost;
                        bucket.count += 1;
                    }
                    None => buckets.push(CategoryAcc {
                        code,
                        total: line.total_cost,
                        count: 1,
                    }),
                }
            }
            CostResult::Unmatched(_) => unmatched_count += 1,
        }
    }

    let categories = buckets
        .into_iter()
        .map(|bucket| CategoryBreakdown {
            percentage: if total_cost > 0.0 {
                (100.0 * bucket.total / total_cost).round() as u32
            } else {
                0
            },
            code: bucket.code,
            total: bucket.total,
            count: bucket.count,
        })
        .collect();

    EstimateSummary {
        total_cost,
        labor_total,
        materials_total,
        machines_total,
        labor_hours_total,
        matched_count,
        unmatched_count,
        total_items: results.len(),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchedLine, UnmatchedLine};

    fn matched(rate_code: &str, total_cost: f64) -> CostResult {
        CostResult::Matched(MatchedLine {
            work_name: format!("Work {rate_code}"),
            quantity: 1.0,
            unit: "m²".to_string(),
            room: String::new(),
            rate_code: rate_code.to_string(),
            rate_name: format!("Rate {rate_code}"),
            unit_cost: total_cost,
            total_cost,
            labor: total_cost * 0.4,
            materials: total_cost * 0.5,
            machines: total_cost * 0.1,
            labor_hours: 1.0,
            alternatives: Vec::new(),
        })
    }

    fn unmatched(name: &str) -> CostResult {
        CostResult::Unmatched(UnmatchedLine {
            work_name: name.to_string(),
            quantity: 1.0,
            unit: String::new(),
            room: String::new(),
            error: "No matching CWICR rate found".to_string(),
        })
    }

    #[test]
    fn empty_input_yields_all_zero_summary() {
        let summary = aggregate_results(&[]);

        assert_eq!(summary.total_cost, 0.0);
        assert_eq!(summary.labor_total, 0.0);
        assert_eq!(summary.matched_count, 0);
        assert_eq!(summary.unmatched_count, 0);
        assert_eq!(summary.total_items, 0);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn counts_partition_the_input() {
        let results = vec![
            matched("12.34.001", 100.0),
            unmatched("Mystery A"),
            matched("56.00.001", 50.0),
            unmatched("Mystery B"),
            unmatched("Mystery C"),
        ];

        let summary = aggregate_results(&results);

        assert_eq!(summary.matched_count, 2);
        assert_eq!(summary.unmatched_count, 3);
        assert_eq!(summary.total_items, results.len());
        assert_eq!(
            summary.matched_count + summary.unmatched_count,
            summary.total_items
        );
        assert_eq!(summary.total_cost, 150.0);
    }

    #[test]
    fn sums_ignore_unmatched_lines() {
        let results = vec![matched("12.34.001", 100.0), unmatched("Mystery")];

        let summary = aggregate_results(&results);

        assert_eq!(summary.total_cost, 100.0);
        assert_eq!(summary.labor_total, 40.0);
        assert_eq!(summary.materials_total, 50.0);
        assert_eq!(summary.machines_total, 10.0);
        assert_eq!(summary.labor_hours_total, 1.0);
    }

    #[test]
    fn categories_group_by_first_two_segments() {
        let results = vec![
            matched("12.34.001", 60.0),
            matched("12.34.002", 30.0),
            matched("56.00.001", 10.0),
        ];

        let summary = aggregate_results(&results);

        assert_eq!(summary.categories.len(), 2);

        let first = &summary.categories[0];
        assert_eq!(first.code.as_str(), "12.34");
        assert_eq!(first.count, 2);
        assert_eq!(first.total, 90.0);
        assert_eq!(first.percentage, 90);

        let second = &summary.categories[1];
        assert_eq!(second.code.as_str(), "56.00");
        assert_eq!(second.count, 1);
        assert_eq!(second.percentage, 10);

        let pct_sum: u32 = summary.categories.iter().map(|c| c.percentage).sum();
        assert!((99..=101).contains(&pct_sum));
    }

    #[test]
    fn missing_rate_code_falls_into_other_bucket() {
        let results = vec![matched("", 40.0), matched("12.34.001", 60.0)];

        let summary = aggregate_results(&results);

        assert_eq!(summary.categories[0].code.as_str(), "Other");
        assert_eq!(summary.categories[0].percentage, 40);
    }

    #[test]
    fn zero_grand_total_never_divides() {
        // Matched lines costing zero still produce category buckets.
        let results = vec![matched("12.34.001", 0.0), matched("56.00.001", 0.0)];

        let summary = aggregate_results(&results);

        assert_eq!(summary.total_cost, 0.0);
        for category in &summary.categories {
            assert_eq!(category.percentage, 0);
        }
    }
}
