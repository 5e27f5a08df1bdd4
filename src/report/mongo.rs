//! MongoDB-backed aggregation runner.
//!
//! # Responsibilities
//! - Build client options from [`StatsConfig`] (URI, credential, timeout)
//! - Connect eagerly (ping) so connection and authentication failures surface
//!   before any aggregation runs
//! - Execute aggregations, counts, and distinct queries, draining cursors

use std::time::Duration;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Database};

use crate::config::StatsConfig;
use crate::report::{AggregationRunner, StatsError, StatsResult};

/// Production [`AggregationRunner`] over the official MongoDB driver.
pub struct MongoRunner {
    db: Database,
}

impl MongoRunner {
    /// Connect and authenticate against the configured release database.
    pub async fn connect(config: &StatsConfig) -> StatsResult<Self> {
        let uri = config.connection_uri();
        tracing::info!(uri = %uri, "connecting to release database");

        let mut options = ClientOptions::parse(&uri)
            .await
            .map_err(|e| StatsError::Connection(e.to_string()))?;
        options.app_name = Some("observation-stats".to_string());
        options.server_selection_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        options.credential = Some(credential(config));

        let client =
            Client::with_options(options).map_err(|e| StatsError::Connection(e.to_string()))?;
        let db = client.database(&config.database);

        // The driver connects lazily; ping now so bad hosts and bad
        // credentials fail here rather than inside the first aggregation.
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| classify(e, "ping"))?;

        tracing::info!(database = %config.database, "connected");
        Ok(Self { db })
    }
}

impl AggregationRunner for MongoRunner {
    async fn run_aggregation(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> StatsResult<Vec<Document>> {
        let query = format!("aggregate {collection}");
        let cursor = self
            .db
            .collection::<Document>(collection)
            .aggregate(pipeline)
            .await
            .map_err(|e| classify(e, &query))?;

        cursor.try_collect().await.map_err(|e| classify(e, &query))
    }

    async fn count_documents(&self, collection: &str) -> StatsResult<u64> {
        self.db
            .collection::<Document>(collection)
            .count_documents(doc! {})
            .await
            .map_err(|e| classify(e, &format!("count {collection}")))
    }

    async fn distinct_values(&self, collection: &str, field: &str) -> StatsResult<Vec<Bson>> {
        self.db
            .collection::<Document>(collection)
            .distinct(field, doc! {})
            .await
            .map_err(|e| classify(e, &format!("distinct {collection}.{field}")))
    }
}

impl std::fmt::Debug for MongoRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoRunner").field("database", &self.db.name()).finish()
    }
}

fn credential(config: &StatsConfig) -> Credential {
    let mut credential = Credential::default();
    credential.username = Some(config.username.clone());
    credential.password = Some(config.password.clone());
    credential
}

/// Map a driver error onto the reporting error taxonomy.
fn classify(error: mongodb::error::Error, query: &str) -> StatsError {
    match error.kind.as_ref() {
        ErrorKind::Authentication { .. } => StatsError::Authentication(error.to_string()),
        ErrorKind::ServerSelection { .. } | ErrorKind::DnsResolve { .. } | ErrorKind::Io(_) => {
            StatsError::Connection(error.to_string())
        }
        _ => StatsError::Query { query: query.to_string(), message: error.to_string() },
    }
}
