//! Summary reporting over an abstract aggregation runner.
//!
//! # Responsibilities
//! - Define the minimal database capability the reporter needs
//!   ([`AggregationRunner`]) so it can be tested against an in-memory fake
//! - Run the three summary queries strictly sequentially, printing one line
//!   after each completes
//! - Optional extended counters over the release collections
//!
//! # Design Decisions
//! - No retries and no partial-result handling: any driver error aborts the
//!   run, leaving earlier printed lines valid and later ones absent
//! - Output goes through `io::Write` so tests can capture it

pub mod mongo;

use std::io::{self, Write};

use mongodb::bson::{Bson, Document};
use thiserror::Error;

use crate::pipeline::{self, SummaryQuery};

pub use mongo::MongoRunner;

/// Collection holding donor documents.
pub const DONOR_COLLECTION: &str = "Donor";
/// Collection holding mutation documents.
pub const MUTATION_COLLECTION: &str = "Mutation";
/// Field identifying the donor on an observation document.
pub const DONOR_ID_FIELD: &str = "_donor_id";

/// Errors that can occur during a reporting run.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Host unreachable or server selection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Credentials rejected by the database.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Malformed pipeline or server-side execution failure.
    #[error("query {query} failed: {message}")]
    Query { query: String, message: String },

    /// Writing a report line failed.
    #[error("report output failed: {0}")]
    Io(#[from] io::Error),
}

/// Result type for reporting operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Minimal read-only database capability the reporter depends on.
///
/// Connecting and authenticating belong to the implementation's constructor;
/// the trait covers query execution only.
#[allow(async_fn_in_trait)]
pub trait AggregationRunner {
    /// Run an aggregation pipeline against a collection, returning all
    /// result documents.
    async fn run_aggregation(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> StatsResult<Vec<Document>>;

    /// Total number of documents in a collection.
    async fn count_documents(&self, collection: &str) -> StatsResult<u64>;

    /// Distinct values of a field across a collection.
    async fn distinct_values(&self, collection: &str, field: &str) -> StatsResult<Vec<Bson>>;
}

/// The three summary counts, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryReport {
    pub donors_with_observations: usize,
    pub affected_gene_ids: usize,
    pub genes_with_affected_donors: usize,
}

/// Extended per-collection counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionStats {
    pub donor_documents: u64,
    pub observation_documents: u64,
    pub mutation_documents: u64,
    pub distinct_observation_donors: usize,
}

impl CollectionStats {
    /// Write the extended counter lines.
    pub fn write_lines<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "There are {} documents in the Donor collection", self.donor_documents)?;
        writeln!(
            out,
            "There are {} documents in the Observation collection",
            self.observation_documents
        )?;
        writeln!(
            out,
            "There are {} documents in the Mutation collection",
            self.mutation_documents
        )?;
        writeln!(
            out,
            "There are {} distinct donors in the Observation collection",
            self.distinct_observation_donors
        )
    }
}

/// Runs the summary queries and writes one report line per metric.
#[derive(Debug)]
pub struct SummaryReporter<R> {
    runner: R,
    collection: String,
}

impl<R: AggregationRunner> SummaryReporter<R> {
    pub fn new(runner: R, collection: impl Into<String>) -> Self {
        Self { runner, collection: collection.into() }
    }

    /// Run one summary query and return its result count.
    pub async fn run_query(&self, query: &SummaryQuery) -> StatsResult<usize> {
        tracing::debug!(query = query.name(), collection = %self.collection, "running aggregation");
        let documents = self
            .runner
            .run_aggregation(&self.collection, query.stage_documents())
            .await?;
        tracing::debug!(query = query.name(), results = documents.len(), "aggregation complete");
        Ok(documents.len())
    }

    /// Run the three summary queries in order, writing a line after each.
    ///
    /// A failure aborts immediately; lines already written stay valid.
    pub async fn report<W: io::Write>(&self, out: &mut W) -> StatsResult<SummaryReport> {
        let query = pipeline::donor_type_counts();
        let donors = self.run_query(&query).await?;
        writeln!(out, "There are {} {}", donors, query.description())?;

        let query = pipeline::affected_gene_ids();
        let genes = self.run_query(&query).await?;
        writeln!(out, "There are {} {}", genes, query.description())?;

        let query = pipeline::gene_donor_summary();
        let gene_donors = self.run_query(&query).await?;
        writeln!(out, "There are {} {}", gene_donors, query.description())?;

        Ok(SummaryReport {
            donors_with_observations: donors,
            affected_gene_ids: genes,
            genes_with_affected_donors: gene_donors,
        })
    }

    /// Gather the extended per-collection counters.
    pub async fn collection_stats(&self) -> StatsResult<CollectionStats> {
        let donor_documents = self.runner.count_documents(DONOR_COLLECTION).await?;
        let observation_documents = self.runner.count_documents(&self.collection).await?;
        let mutation_documents = self.runner.count_documents(MUTATION_COLLECTION).await?;
        let distinct_observation_donors = self
            .runner
            .distinct_values(&self.collection, DONOR_ID_FIELD)
            .await?
            .len();

        Ok(CollectionStats {
            donor_documents,
            observation_documents,
            mutation_documents,
            distinct_observation_donors,
        })
    }
}
