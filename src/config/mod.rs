//! Configuration management.
//!
//! # Data Flow
//! ```text
//! wrapper script (CLI flags / env vars)
//!     → main.rs (clap parse)
//!     → StatsConfig (schema.rs)
//!     → validation.rs (semantic checks)
//!     → passed by reference into MongoRunner::connect
//! ```
//!
//! # Design Decisions
//! - Credentials are never hard-coded; the invoking wrapper supplies them
//! - Config is immutable for the lifetime of a run
//! - Validation separates syntactic (clap/serde) from semantic checks

pub mod schema;
pub mod validation;

pub use schema::StatsConfig;
pub use validation::{validate_config, ValidationError};
