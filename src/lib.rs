//! Cost-estimation backend for a construction-management suite.
//!
//! Turns free text or a photograph describing construction work into a
//! priced, itemized estimate with aggregated totals, CSV/HTML exports, and a
//! persisted record.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod services;
