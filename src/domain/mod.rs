//! Domain types for the estimation pipeline.
//!
//! These types define the data flowing through the pipeline: work items in,
//! priced cost results out, aggregated into summaries and persisted as
//! estimates.

pub mod estimate;
pub mod language;

pub use estimate::*;
pub use language::{get_lang_config, LangConfig};
