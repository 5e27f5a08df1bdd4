//! Aggregation pipelines as data.
//!
//! Each summary metric is described by a [`SummaryQuery`]: a named sequence
//! of [`Stage`] descriptors plus the noun phrase used in its report line.
//! Keeping the pipelines as typed values means their construction can be unit
//! tested without a database, and the stage documents handed to the driver
//! are built in exactly one place.

pub mod queries;

use mongodb::bson::{doc, Document};

pub use queries::{affected_gene_ids, donor_type_counts, gene_donor_summary};

/// One aggregation stage, rendered to the driver's wire document on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// `$project` with the given field specification.
    Project(Document),
    /// `$group` with the given `_id` and accumulators.
    Group(Document),
    /// `$unwind` of the given field path (e.g. `"$geneIds"`).
    Unwind(String),
}

impl Stage {
    /// The stage operator name as it appears on the wire.
    pub fn operator(&self) -> &'static str {
        match self {
            Stage::Project(_) => "$project",
            Stage::Group(_) => "$group",
            Stage::Unwind(_) => "$unwind",
        }
    }

    /// Render this stage as a pipeline document.
    pub fn to_document(&self) -> Document {
        match self {
            Stage::Project(spec) => doc! { "$project": spec.clone() },
            Stage::Group(spec) => doc! { "$group": spec.clone() },
            Stage::Unwind(path) => doc! { "$unwind": path.clone() },
        }
    }
}

/// A named read-only aggregation over the observation collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryQuery {
    name: &'static str,
    description: &'static str,
    stages: Vec<Stage>,
}

impl SummaryQuery {
    pub(crate) fn new(name: &'static str, description: &'static str, stages: Vec<Stage>) -> Self {
        Self { name, description, stages }
    }

    /// Short identifier for logging.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Noun phrase completing the `"There are <N> ..."` report line.
    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The pipeline as the driver expects it.
    pub fn stage_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }
}
