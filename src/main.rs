//! Observation summary reporter binary.
//!
//! Intended to be invoked by a wrapper script that supplies the host,
//! database name, and credentials. Prints three summary lines to stdout:
//!
//! ```text
//! There are <N> donors with observations
//! There are <N> uniquely affected gene ids
//! There are <N> genes with affected donors
//! ```
//!
//! Any driver error aborts the run with a non-zero exit status.

use std::io::Write;

use clap::Parser;

use observation_stats::config::{validate_config, StatsConfig};
use observation_stats::report::{MongoRunner, SummaryReporter};

#[derive(Parser)]
#[command(name = "observation-stats")]
#[command(about = "Summary statistics for observation data in a release database", long_about = None)]
struct Cli {
    /// Database host, e.g. "localhost:27017"
    #[arg(long, env = "OBS_STATS_HOST")]
    host: String,

    /// Release database name
    #[arg(long, env = "OBS_STATS_DATABASE")]
    database: String,

    /// Database username
    #[arg(long, env = "OBS_STATS_USERNAME")]
    username: String,

    /// Database password
    #[arg(long, env = "OBS_STATS_PASSWORD", hide_env_values = true)]
    password: String,

    /// Observation collection name
    #[arg(long, default_value = observation_stats::config::schema::DEFAULT_COLLECTION)]
    collection: String,

    /// Server selection timeout in seconds
    #[arg(long, default_value_t = 30)]
    connect_timeout_secs: u64,

    /// Also report per-collection document counts
    #[arg(long)]
    extended: bool,
}

impl Cli {
    fn into_config(self) -> StatsConfig {
        StatsConfig {
            host: self.host,
            database: self.database,
            username: self.username,
            password: self.password,
            collection: self.collection,
            connect_timeout_secs: self.connect_timeout_secs,
            extended: self.extended,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observation_stats::observability::init_logging();

    let config = Cli::parse().into_config();
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(error = %error, "invalid configuration");
        }
        return Err("invalid configuration".into());
    }

    tracing::info!(
        host = %config.host,
        database = %config.database,
        collection = %config.collection,
        "configuration loaded"
    );

    let runner = MongoRunner::connect(&config).await?;
    let reporter = SummaryReporter::new(runner, &config.collection);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    reporter.report(&mut out).await?;

    if config.extended {
        reporter.collection_stats().await?.write_lines(&mut out)?;
    }
    out.flush()?;

    Ok(())
}
