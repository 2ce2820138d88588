//! Catalog query command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use corpgraph_core::highlights::highlights;
use corpgraph_core::normalize::normalize_analytic;
use corpgraph_core::{AppConfig, QueryType};
use corpgraph_graph::GraphStore;
use corpgraph_web::routes::query::{QueryResponse, NO_DATA_MESSAGE};

use crate::output;

#[derive(Args)]
pub struct QueryArgs {
    /// Query discriminator, e.g. top-paid-defence
    pub query_type: Option<String>,

    /// List the available discriminators
    #[arg(long)]
    pub list: bool,

    /// Print the full JSON response instead of a summary
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: QueryArgs, config: &AppConfig) -> Result<()> {
    if args.list {
        output::print_catalog();
        return Ok(());
    }

    // Reject bad discriminators before connecting.
    let query_type = QueryType::parse_param(args.query_type.as_deref())?;
    let def = query_type.definition();

    let client = super::connect(config).await?;
    let rows = client.analytic(query_type).await?;
    let view = normalize_analytic(query_type, &rows);
    let highlights = highlights(&def, &view);

    let response = QueryResponse {
        query_type: query_type.as_str(),
        description: def.description,
        message: view.is_empty().then_some(NO_DATA_MESSAGE),
        view,
        highlights,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{} {}", response.query_type.cyan().bold(), format!("({})", response.description).dimmed());
    println!("{}", "─".repeat(50));
    if let Some(message) = response.message {
        println!("{}", message.dimmed());
        return Ok(());
    }
    output::print_view(&response.view);
    if let Some(highlights) = &response.highlights {
        output::print_highlights(highlights);
    }

    Ok(())
}
