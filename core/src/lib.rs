//! Ad-sales analytics: a seeded synthetic campaign table and the metrics
//! reporter that reads it back.
//!
//! PIPELINE:
//!   generator  -> dataset (CSV)  -> report -> render (console)
//!                                          -> charts (SVG)
//!                                          -> report_summary.json
//!
//! RULE: the CSV file is the only hand-off between generation and reporting.

pub mod charts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod record;
pub mod render;
pub mod report;
pub mod rng;
pub mod types;
