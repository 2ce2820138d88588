//! Web server command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use corpgraph_core::AppConfig;
use corpgraph_web::AppState;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config and PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (default: logs/corpgraph.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    let client = super::connect(&config).await?;
    let addr = config.server.bind_addr();

    println!();
    println!("  {} {}", "corpgraph".cyan().bold(), "API Server".bold());
    println!();
    println!("  {}       http://{}/api", "API".green(), addr);
    println!("  {}    http://{}/api/health", "Health".green(), addr);
    println!("  {}     {}", "Neo4j".green(), config.graph.uri);
    println!(
        "  {} {}",
        "Reference".green(),
        config.data.reference_dataset.display()
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let state = AppState::new(Arc::new(client), config.data);
    corpgraph_web::run_server(state, &addr).await?;

    Ok(())
}
