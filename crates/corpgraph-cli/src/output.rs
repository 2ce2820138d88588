//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use serde_json::Value;

use corpgraph_core::highlights::{CompanyHighlight, DirectorHighlight};
use corpgraph_core::{Classification, GraphView, Highlights, QueryType};

/// Print the catalog as a table.
pub fn print_catalog() {
    println!("{:<26} {}", "Type", "Description");
    println!("{}", "-".repeat(76));
    for query in QueryType::ALL {
        println!("{:<26} {}", query.as_str().cyan(), query.definition().description);
    }
}

fn classification(tag: Classification) -> ColoredString {
    match tag {
        Classification::Director => "director".magenta(),
        Classification::Primary => "primary".green(),
        Classification::Secondary => "secondary".yellow(),
    }
}

/// Print nodes and links of a view.
pub fn print_view(view: &GraphView) {
    let stats = &view.statistics;
    println!(
        "  {} nodes ({} companies, {} directors), {} links",
        stats.total_nodes.to_string().bold(),
        stats.companies,
        stats.directors,
        stats.total_links.to_string().bold()
    );
    println!();

    for node in &view.nodes {
        println!(
            "  {} [{}] {} {}",
            "•".dimmed(),
            classification(node.classification),
            node.label,
            format!("#{}", node.id).dimmed()
        );
    }

    if !view.links.is_empty() {
        println!();
        for link in &view.links {
            let label = |id: &str| view.node(id).map_or(id.to_string(), |n| n.label.clone());
            println!(
                "  {} {} {} {}",
                label(&link.source),
                "-[".dimmed(),
                link.rel_type.yellow(),
                format!("]-> {}", label(&link.target)).dimmed()
            );
        }
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn print_director(rank: usize, director: &DirectorHighlight) {
    let metric = director
        .metric
        .iter()
        .map(|(k, v)| format!("{}={}", k, display(v)))
        .collect::<Vec<_>>()
        .join(", ");
    println!("  {}. {} {}", rank, director.name.bold(), metric.dimmed());
}

fn print_company(company: &CompanyHighlight) {
    let mut details: Vec<String> = company
        .ranking
        .iter()
        .map(|(k, v)| format!("{}={}", k, display(v)))
        .collect();
    if let Some(formatted) = &company.formatted_capital {
        details.push(formatted.clone());
    }
    if let Some(count) = company.directors_count {
        details.push(format!("{} directors", count));
    }
    println!("  {} {} {}", "•".dimmed(), company.name.bold(), details.join(", ").dimmed());
    if let Some(directors) = &company.directors {
        for name in directors {
            println!("      {}", name);
        }
    }
}

pub fn print_highlights(highlights: &Highlights) {
    println!();
    println!("{}", "Highlights".bold());
    match highlights {
        Highlights::TopDirectors { top_directors } => {
            for (i, director) in top_directors.iter().enumerate() {
                print_director(i + 1, director);
            }
        }
        Highlights::Companies { companies } => {
            for company in companies {
                print_company(company);
            }
        }
    }
}
