//! Método Rodriguez chick-quality toolkit.
//!
//! Captures per-stage hatchery evaluations (egg reception, hatchery,
//! transport, farm reception, seven-day follow-up), reduces sampled
//! observations into composite quality scores, persists summary and detail
//! rows to worksheet-shaped tables, and aggregates cross-stage KPIs for the
//! batch dashboard.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod scoring;
pub mod stages;
pub mod store;
pub mod telemetry;
