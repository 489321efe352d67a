//! HTML report exporter.
//!
//! Renders a self-contained printable document: summary cards, a result
//! table, and a footer total. Deterministic for given inputs apart from the
//! generation date line.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::domain::{get_lang_config, CostResult, EstimateSummary};

/// Render the printable estimate report.
pub fn export_html(results: &[CostResult], summary: &EstimateSummary, language: &str) -> String {
    render_html(results, summary, language, Utc::now())
}

/// Deterministic inner renderer; tests pin the timestamp.
pub(crate) fn render_html(
    results: &[CostResult],
    summary: &EstimateSummary,
    language: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let sym = get_lang_config(language).sym;
    let mut out = String::with_capacity(4096);

    out.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Cost Estimate</title>\n<style>\n",
    );
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str("<h1>Cost Estimate</h1>\n");
    let _ = writeln!(
        out,
        "<p class=\"meta\">Language: {} &middot; Items: {} &middot; Generated: {}</p>",
        escape(language),
        summary.total_items,
        generated_at.format("%Y-%m-%d %H:%M UTC"),
    );

    out.push_str("<div class=\"cards\">\n");
    summary_card(&mut out, "Total Cost", summary.total_cost, sym);
    summary_card(&mut out, "Labor", summary.labor_total, sym);
    summary_card(&mut out, "Materials", summary.materials_total, sym);
    summary_card(&mut out, "Machines", summary.machines_total, sym);
    out.push_str("</div>\n");

    out.push_str("<table>\n<thead>\n<tr><th>#</th><th>Work</th><th>Rate Code</th><th>Qty</th><th>Unit Cost</th><th>Total</th><th>Room</th></tr>\n</thead>\n<tbody>\n");

    for (i, result) in results.iter().enumerate() {
        match result {
            CostResult::Matched(line) => {
                let _ = writeln!(
                    out,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td></tr>",
                    i + 1,
                    escape(&line.work_name),
                    escape(&line.rate_code),
                    qty_with_unit(line.quantity, &line.unit),
                    money(line.unit_cost, sym),
                    money(line.total_cost, sym),
                    escape(&line.room),
                );
            }
            CostResult::Unmatched(line) => {
                let _ = writeln!(
                    out,
                    "<tr><td>{}</td><td>{}</td><td></td><td>{}</td><td class=\"muted\" colspan=\"2\">No match</td><td>{}</td></tr>",
                    i + 1,
                    escape(&line.work_name),
                    qty_with_unit(line.quantity, &line.unit),
                    escape(&line.room),
                );
            }
        }
    }

    out.push_str("</tbody>\n<tfoot>\n");
    let _ = writeln!(
        out,
        "<tr><td colspan=\"5\" class=\"total-label\">Total</td><td class=\"num total\">{}</td><td></td></tr>",
        money(summary.total_cost, sym),
    );
    out.push_str("</tfoot>\n</table>\n</body>\n</html>\n");

    out
}

const STYLE: &str = "\
body { font-family: Arial, Helvetica, sans-serif; margin: 24px; color: #222; }
h1 { margin-bottom: 4px; }
.meta { color: #666; margin-top: 0; }
.cards { display: flex; gap: 12px; margin: 16px 0; }
.card { border: 1px solid #ddd; border-radius: 6px; padding: 12px 16px; min-width: 120px; }
.card .label { font-size: 12px; color: #666; text-transform: uppercase; }
.card .value { font-size: 20px; font-weight: bold; margin-top: 4px; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 6px 8px; text-align: left; }
th { background: #f5f5f5; }
.num { text-align: right; }
.muted { color: #999; font-style: italic; text-align: center; }
.total-label { text-align: right; font-weight: bold; }
.total { font-weight: bold; }
@media print { body { margin: 0; } }
";

fn summary_card(out: &mut String, label: &str, value: f64, sym: &str) {
    let _ = writeln!(
        out,
        "<div class=\"card\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
        label,
        money(value, sym),
    );
}

fn money(value: f64, sym: &str) -> String {
    format!("{sym}{value:.2}")
}

fn qty_with_unit(quantity: f64, unit: &str) -> String {
    let qty = if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        format!("{quantity}")
    };
    if unit.is_empty() {
        qty
    } else {
        format!("{qty} {}", escape(unit))
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
