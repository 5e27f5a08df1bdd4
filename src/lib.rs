//! Observation Summary Reporter
//!
//! Reports summary statistics about genomic `Observation` documents stored in
//! a MongoDB release database. All grouping and deduplication runs
//! server-side via the aggregation framework; this tool only describes the
//! pipelines, counts the results, and prints one line per metric.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI / env vars ──▶ config ──▶ MongoRunner (connect + auth)
//!                                      │
//!                        pipeline ─────┤  typed $project/$group/$unwind
//!                        builders      ▼  stage descriptions
//!                                SummaryReporter
//!                                      │  one aggregation per metric,
//!                                      ▼  strictly sequential
//!                                  stdout: "There are <N> ..."
//! ```
//!
//! The reporter is read-only: it never writes to the database.

pub mod config;
pub mod observability;
pub mod pipeline;
pub mod report;

pub use config::StatsConfig;
pub use pipeline::{Stage, SummaryQuery};
pub use report::{AggregationRunner, MongoRunner, StatsError, SummaryReporter};
