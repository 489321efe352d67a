//! The cost-estimation pipeline.
//!
//! Data flows one direction: input → work items → priced/unpriced lines →
//! summary → export/persist. No stage mutates a previous stage's output.

pub mod aggregate;
pub mod export;
pub mod facade;
pub mod orchestrator;

pub use aggregate::aggregate_results;
pub use facade::{EstimateOutcome, EstimatePipeline, PipelineError};
pub use orchestrator::estimate_works;
