//! Status command.

use anyhow::Result;
use colored::Colorize;

use corpgraph_core::reference::load_or_degrade;
use corpgraph_core::AppConfig;

pub async fn execute(config: &AppConfig) -> Result<()> {
    println!("{}", "Ownership Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  Neo4j:         {}", config.graph.uri.dimmed());

    let client = super::connect(config).await?;
    let counts = client.get_counts().await?;
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());
    println!("  Companies:     {}", counts.companies.to_string().cyan());
    println!("  Directors:     {}", counts.directors.to_string().cyan());

    let reference = load_or_degrade(&config.data.reference_dataset);
    match reference.set {
        Some(set) => println!("  Reference:     {} CINs", set.len().to_string().green()),
        None => println!(
            "  Reference:     {} ({})",
            "unavailable".yellow(),
            config.data.reference_dataset.display()
        ),
    }

    println!("{}", "─".repeat(40));
    Ok(())
}
