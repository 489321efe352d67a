//! Estimate exporters.
//!
//! Pure, deterministic renderers of (results, summary) into external
//! formats. Byte-level shape matters for both: spreadsheet CSV and the
//! printable HTML report.

pub mod csv;
pub mod html;

pub use csv::export_csv;
pub use html::export_html;
