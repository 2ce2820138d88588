//! Schema commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use corpgraph_core::AppConfig;
use corpgraph_graph::schema::{initialize_schema, SCHEMA_STATEMENTS};

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Create the CIN/DIN uniqueness constraints and the company-name index
    Init,
}

pub async fn execute(cmd: SchemaCommands, config: &AppConfig) -> Result<()> {
    match cmd {
        SchemaCommands::Init => {
            let client = super::connect(config).await?;
            initialize_schema(&client).await?;
            println!(
                "{} {} statements applied",
                "Schema ready:".green().bold(),
                SCHEMA_STATEMENTS.len()
            );
            Ok(())
        }
    }
}
