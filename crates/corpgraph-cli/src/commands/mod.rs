//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use corpgraph_core::AppConfig;
use corpgraph_graph::GraphClient;

pub mod query;
pub mod schema;
pub mod serve;
pub mod status;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Corporate-ownership graph service
#[derive(Parser)]
#[command(name = "corpgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "CORPGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve(serve::ServeArgs),

    /// Run a catalog query and print the normalized view
    Query(query::QueryArgs),

    /// Schema management
    #[command(subcommand)]
    Schema(schema::SchemaCommands),

    /// Show graph and reference dataset status
    Status,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Query(args) => query::execute(args, &config).await,
            Commands::Schema(cmd) => schema::execute(cmd, &config).await,
            Commands::Status => status::execute(&config).await,
        }
    }
}

/// Connect to Neo4j, failing fast when it is unreachable.
pub async fn connect(config: &AppConfig) -> Result<GraphClient> {
    tokio::time::timeout(CONNECT_TIMEOUT, GraphClient::connect(&config.graph))
        .await
        .with_context(|| format!("Timed out connecting to Neo4j at {}", config.graph.uri))?
}
