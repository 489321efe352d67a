//! Service layer modules for external collaborators.
//!
//! Contains the port traits the pipeline depends on and their production
//! implementations: the work-extractor AI service, the CWICR rate catalog
//! search service, and the Postgres estimate store.

pub mod catalog;
pub mod extractor;
pub mod store;

pub use catalog::{calculate_costs, CatalogError, HttpCatalogClient, RateCatalog};
pub use extractor::{ExtractionError, HttpWorkExtractor, WorkExtractor};
pub use store::{EstimateStore, PgEstimateStore};
