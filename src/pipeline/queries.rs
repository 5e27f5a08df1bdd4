//! The three summary queries.
//!
//! Field names and grouping keys are part of the release database contract
//! and must not change: observations carry `_donor_id`, `_type`, and a
//! `consequence` array whose elements carry `_gene_id`.

use mongodb::bson::doc;

use crate::pipeline::{Stage, SummaryQuery};

/// Per-donor observation counts by type.
///
/// Groups observations by `(donorId, type)` counting occurrences, then
/// regroups by donor collecting the `{type, typeCount}` set. The result count
/// is the number of donors with at least one observation.
pub fn donor_type_counts() -> SummaryQuery {
    SummaryQuery::new(
        "donor_type_counts",
        "donors with observations",
        vec![
            Stage::Project(doc! { "_id": 0, "donorId": "$_donor_id", "type": "$_type" }),
            Stage::Group(doc! {
                "_id": { "donorId": "$donorId", "type": "$type" },
                "typeCount": { "$sum": 1 },
            }),
            Stage::Group(doc! {
                "_id": "$_id.donorId",
                "typeCounts": { "$addToSet": { "type": "$_id.type", "typeCount": "$typeCount" } },
            }),
            Stage::Project(doc! { "_id": 0, "donorId": "$_id", "typeCounts": 1 }),
        ],
    )
}

/// Distinct gene ids referenced by any observation consequence.
pub fn affected_gene_ids() -> SummaryQuery {
    SummaryQuery::new(
        "affected_gene_ids",
        "uniquely affected gene ids",
        vec![
            Stage::Project(doc! { "_id": 0, "geneIds": "$consequence._gene_id" }),
            Stage::Unwind("$geneIds".to_string()),
            Stage::Group(doc! { "_id": "$geneIds" }),
            Stage::Project(doc! { "_id": 0, "geneId": "$_id" }),
        ],
    )
}

/// Per-gene summary of affected donors and their observation types.
///
/// Deduplicates by `(geneId, donorId, type)`, regroups by `(geneId, donorId)`
/// collecting the type set, then regroups by gene collecting the
/// `{donorId, types}` set. The result count is the number of genes affecting
/// at least one donor.
pub fn gene_donor_summary() -> SummaryQuery {
    SummaryQuery::new(
        "gene_donor_summary",
        "genes with affected donors",
        vec![
            Stage::Project(doc! {
                "_id": 0,
                "donorId": "$_donor_id",
                "type": "$_type",
                "geneIds": "$consequence._gene_id",
            }),
            Stage::Unwind("$geneIds".to_string()),
            Stage::Group(doc! {
                "_id": { "geneId": "$geneIds", "donorId": "$donorId", "type": "$type" },
            }),
            Stage::Group(doc! {
                "_id": { "geneId": "$_id.geneId", "donorId": "$_id.donorId" },
                "types": { "$addToSet": "$_id.type" },
            }),
            Stage::Group(doc! {
                "_id": "$_id.geneId",
                "donors": { "$addToSet": { "donorId": "$_id.donorId", "types": "$types" } },
            }),
            Stage::Project(doc! { "_id": 0, "geneId": "$_id" }),
        ],
    )
}
