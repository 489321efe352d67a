//! CSV exporter.
//!
//! Renders a cost-result list into spreadsheet CSV: a fixed header row plus
//! one row per result, joined by `\n` with no trailing newline.

use std::fmt::Write;

use crate::domain::CostResult;

const HEADER: &str =
    "No,Work Name,Rate Code,Rate Name,Qty,Unit,Unit Cost,Total Cost,Labor,Materials,Machines,Room";

/// Render results to CSV.
///
/// Free-text fields (work name, rate name, room) are double-quoted with
/// internal quotes doubled. Money columns carry exactly two decimals;
/// unmatched rows leave rate and cost columns empty.
pub fn export_csv(results: &[CostResult]) -> String {
    let mut out = String::from(HEADER);

    for (i, result) in results.iter().enumerate() {
        out.push('\n');
        match result {
            CostResult::Matched(line) => {
                // Infallible: writing to a String cannot fail.
                let _ = write!(
                    out,
                    "{},{},{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{}",
                    i + 1,
                    quote(&line.work_name),
                    line.rate_code,
                    quote(&line.rate_name),
                    format_quantity(line.quantity),
                    line.unit,
                    line.unit_cost,
                    line.total_cost,
                    line.labor,
                    line.materials,
                    line.machines,
                    quote(&line.room),
                );
            }
            CostResult::Unmatched(line) => {
                let _ = write!(
                    out,
                    "{},{},,,{},{},,,,,,{}",
                    i + 1,
                    quote(&line.work_name),
                    format_quantity(line.quantity),
                    line.unit,
                    quote(&line.room),
                );
            }
        }
    }

    out
}

/// Standard CSV quoting: wrap in double quotes, double internal quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Whole quantities print without a decimal point.
fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        format!("{quantity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchedLine, UnmatchedLine};

    fn matched_line() -> CostResult {
        CostResult::Matched(MatchedLine {
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
        })
    }

    fn unmatched_line() -> CostResult {
        CostResult::Unmatched(UnmatchedLine {
            work_name: "Mystery work".to_string(),
            quantity: 2.5,
            unit: "pcs".to_string(),
            room: "Hall".to_string(),
            error: "No matching CWICR rate found".to_string(),
        })
    }

    #[test]
    fn header_plus_one_row_per_result() {
        let results = vec![matched_line(), unmatched_line(), matched_line()];
        let csv = export_csv(&results);

        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), results.len() + 1);
        assert_eq!(lines[0], HEADER);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn matched_row_formats_money_to_two_decimals() {
        let csv = export_csv(&[matched_line()]);
        let row = csv.split('\n').nth(1).unwrap();

        assert_eq!(
            row,
            "1,\"Concrete wall\",12.34.056,\"Cast-in-place concrete wall\",10,m²,50.00,500.00,200.00,250.00,50.00,\"Room 1\""
        );
    }

    #[test]
    fn unmatched_row_leaves_rate_and_cost_columns_empty() {
        let csv = export_csv(&[unmatched_line()]);
        let row = csv.split('\n').nth(1).unwrap();

        assert_eq!(row, "1,\"Mystery work\",,,2.5,pcs,,,,,,\"Hall\"");
        assert_eq!(row.matches(',').count(), 11);
    }

    #[test]
    fn row_numbers_are_one_based() {
        let csv = export_csv(&[matched_line(), matched_line()]);
        let rows: Vec<&str> = csv.split('\n').skip(1).collect();

        assert!(rows[0].starts_with("1,"));
        assert!(rows[1].starts_with("2,"));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let result = CostResult::Unmatched(UnmatchedLine {
            work_name: "Install \"smart\" panel".to_string(),
            quantity: 1.0,
            unit: String::new(),
            room: String::new(),
            error: "No matching CWICR rate found".to_string(),
        });

        let csv = export_csv(&[result]);
        assert!(csv.contains("\"Install \"\"smart\"\" panel\""));
    }

    #[test]
    fn empty_results_render_header_only() {
        assert_eq!(export_csv(&[]), HEADER);
    }

    #[test]
    fn quantities_beyond_integer_precision_still_render_whole() {
        // Large whole quantities must not lose digits when rendered.
        assert_eq!(format_quantity(10.0), "10");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(9_007_199_254_740_992.0), "9007199254740992");
    }
}
