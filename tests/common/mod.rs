//! Shared utilities for integration testing without a live MongoDB.
//!
//! [`FakeRunner`] implements [`AggregationRunner`] over in-memory documents,
//! backed by a small evaluator for the pipeline subset the summary queries
//! use (`$project`, `$unwind`, `$group` with `$sum` and `$addToSet`). The
//! evaluator follows MongoDB path semantics far enough that the real stage
//! documents produced by the pipeline builders run unmodified.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use mongodb::bson::{Bson, Document};
use observation_stats::report::{AggregationRunner, StatsError, StatsResult};

/// In-memory stand-in for the aggregation runner.
#[derive(Default)]
pub struct FakeRunner {
    collections: HashMap<String, Vec<Document>>,
    /// Number of successful aggregations before an injected failure.
    fail_after: Option<usize>,
    aggregations: AtomicUsize,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: &str, documents: Vec<Document>) -> Self {
        self.collections.insert(name.to_string(), documents);
        self
    }

    /// Fail every aggregation after `successes` successful ones.
    pub fn failing_after(mut self, successes: usize) -> Self {
        self.fail_after = Some(successes);
        self
    }

    fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections.get(collection).cloned().unwrap_or_default()
    }
}

impl AggregationRunner for FakeRunner {
    async fn run_aggregation(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> StatsResult<Vec<Document>> {
        let completed = self.aggregations.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if completed >= limit {
                return Err(StatsError::Query {
                    query: format!("aggregate {collection}"),
                    message: "injected failure".to_string(),
                });
            }
        }
        Ok(evaluate(self.documents(collection), &pipeline))
    }

    async fn count_documents(&self, collection: &str) -> StatsResult<u64> {
        Ok(self.documents(collection).len() as u64)
    }

    async fn distinct_values(&self, collection: &str, field: &str) -> StatsResult<Vec<Bson>> {
        let mut seen = Vec::new();
        let mut values = Vec::new();
        for doc in self.documents(collection) {
            let resolved = match resolve_path(&doc, field) {
                Some(value) => value,
                None => continue,
            };
            let flattened = match resolved {
                Bson::Array(items) => items,
                other => vec![other],
            };
            for value in flattened {
                let key = format!("{value:?}");
                if !seen.contains(&key) {
                    seen.push(key);
                    values.push(value);
                }
            }
        }
        Ok(values)
    }
}

/// Run a pipeline of stage documents over the input documents.
pub fn evaluate(mut documents: Vec<Document>, pipeline: &[Document]) -> Vec<Document> {
    for stage in pipeline {
        let (operator, spec) = stage.iter().next().expect("empty pipeline stage");
        documents = match operator.as_str() {
            "$project" => project(documents, spec.as_document().expect("$project spec")),
            "$unwind" => unwind(documents, spec.as_str().expect("$unwind path")),
            "$group" => group(documents, spec.as_document().expect("$group spec")),
            other => panic!("unsupported pipeline stage: {other}"),
        };
    }
    documents
}

fn project(documents: Vec<Document>, spec: &Document) -> Vec<Document> {
    documents
        .into_iter()
        .map(|doc| {
            let mut out = Document::new();
            for (field, value) in spec {
                match value {
                    // "_id": 0 exclusion, "field": 1 inclusion
                    Bson::Int32(0) | Bson::Int64(0) => {}
                    Bson::Int32(1) | Bson::Int64(1) => {
                        if let Some(existing) = doc.get(field) {
                            out.insert(field.clone(), existing.clone());
                        }
                    }
                    expr => {
                        if let Some(computed) = eval_expr(&doc, expr) {
                            out.insert(field.clone(), computed);
                        }
                    }
                }
            }
            out
        })
        .collect()
}

fn unwind(documents: Vec<Document>, path: &str) -> Vec<Document> {
    let field = path.strip_prefix('$').expect("$unwind path must start with $");
    let mut out = Vec::new();
    for doc in documents {
        match doc.get(field) {
            Some(Bson::Array(items)) => {
                for item in items {
                    let mut unwound = doc.clone();
                    unwound.insert(field, item.clone());
                    out.push(unwound);
                }
            }
            Some(_) => out.push(doc),
            // missing field: document is dropped
            None => {}
        }
    }
    out
}

fn group(documents: Vec<Document>, spec: &Document) -> Vec<Document> {
    let id_expr = spec.get("_id").expect("$group requires _id");

    // group key (stringified) -> (key value, member documents), first-seen order
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (Bson, Vec<Document>)> = HashMap::new();
    for doc in documents {
        let key = eval_expr(&doc, id_expr).unwrap_or(Bson::Null);
        let key_string = format!("{key:?}");
        groups
            .entry(key_string.clone())
            .or_insert_with(|| {
                order.push(key_string);
                (key, Vec::new())
            })
            .1
            .push(doc);
    }

    order
        .iter()
        .map(|key_string| {
            let (key, members) = &groups[key_string];
            let mut out = Document::new();
            out.insert("_id", key.clone());
            for (field, accumulator) in spec {
                if field == "_id" {
                    continue;
                }
                let accumulator = accumulator.as_document().expect("accumulator spec");
                let (operator, argument) = accumulator.iter().next().expect("empty accumulator");
                let value = match operator.as_str() {
                    "$sum" => sum(members, argument),
                    "$addToSet" => add_to_set(members, argument),
                    other => panic!("unsupported accumulator: {other}"),
                };
                out.insert(field.clone(), value);
            }
            out
        })
        .collect()
}

fn sum(members: &[Document], argument: &Bson) -> Bson {
    let per_document = match argument {
        Bson::Int32(n) => i64::from(*n),
        Bson::Int64(n) => *n,
        other => panic!("unsupported $sum argument: {other:?}"),
    };
    Bson::Int64(per_document * members.len() as i64)
}

fn add_to_set(members: &[Document], argument: &Bson) -> Bson {
    let mut seen = Vec::new();
    let mut set = Vec::new();
    for member in members {
        let value = eval_expr(member, argument).unwrap_or(Bson::Null);
        let key = format!("{value:?}");
        if !seen.contains(&key) {
            seen.push(key);
            set.push(value);
        }
    }
    Bson::Array(set)
}

/// Evaluate an expression against one document.
///
/// Supports field paths (`"$a.b"`), literal values, and nested documents of
/// expressions (as used in `$group` keys and `$addToSet` arguments).
fn eval_expr(doc: &Document, expr: &Bson) -> Option<Bson> {
    match expr {
        Bson::String(s) => match s.strip_prefix('$') {
            Some(path) => resolve_path(doc, path),
            None => Some(expr.clone()),
        },
        Bson::Document(fields) => {
            let mut out = Document::new();
            for (field, value) in fields {
                if let Some(evaluated) = eval_expr(doc, value) {
                    out.insert(field.clone(), evaluated);
                }
            }
            Some(Bson::Document(out))
        }
        other => Some(other.clone()),
    }
}

/// Resolve a dotted field path, traversing arrays the way MongoDB does:
/// a path through an array of documents yields the array of resolved values.
fn resolve_path(doc: &Document, path: &str) -> Option<Bson> {
    let segments: Vec<&str> = path.split('.').collect();
    resolve(&Bson::Document(doc.clone()), &segments)
}

fn resolve(value: &Bson, segments: &[&str]) -> Option<Bson> {
    if segments.is_empty() {
        return Some(value.clone());
    }
    match value {
        Bson::Document(doc) => doc.get(segments[0]).and_then(|v| resolve(v, &segments[1..])),
        Bson::Array(items) => {
            let resolved: Vec<Bson> =
                items.iter().filter_map(|item| resolve(item, segments)).collect();
            Some(Bson::Array(resolved))
        }
        _ => None,
    }
}
