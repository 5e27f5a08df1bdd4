//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Default collection holding observation documents.
pub const DEFAULT_COLLECTION: &str = "Observation";

/// Runtime configuration for one reporting run.
///
/// Host, database name, and credentials are supplied externally (CLI flags or
/// environment variables set by the invoking wrapper).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Database host, e.g. "localhost:27017".
    pub host: String,

    /// Release database name.
    pub database: String,

    /// Username for the database's native authentication.
    pub username: String,

    /// Password for the database's native authentication.
    pub password: String,

    /// Observation collection name.
    pub collection: String,

    /// Server selection timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Also report per-collection document counts.
    pub extended: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            database: String::new(),
            username: String::new(),
            password: String::new(),
            collection: DEFAULT_COLLECTION.to_string(),
            connect_timeout_secs: 30,
            extended: false,
        }
    }
}

impl StatsConfig {
    /// Connection URI of the form `mongodb://<host>/<database>`.
    ///
    /// A trailing slash already present on the host is not doubled.
    pub fn connection_uri(&self) -> String {
        let separator = if self.host.ends_with('/') { "" } else { "/" };
        format!("mongodb://{}{}{}", self.host, separator, self.database)
    }
}
