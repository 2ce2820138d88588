//! Per-query digests attached to analytical responses.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::catalog::{HighlightStyle, QueryDefinition, SortOrder};
use crate::model::{GraphNode, GraphView, NodeKind, Properties};
use crate::representative::numeric;

const TOP_DIRECTORS: usize = 5;
const CRORE: f64 = 10_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Highlights {
    TopDirectors { top_directors: Vec<DirectorHighlight> },
    Companies { companies: Vec<CompanyHighlight> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorHighlight {
    pub name: String,
    /// The enriched metric under its property name.
    #[serde(flatten)]
    pub metric: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyHighlight {
    pub name: String,
    #[serde(flatten)]
    pub ranking: Properties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_capital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directors_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directors: Option<Vec<String>>,
}

/// `"5.00 Crores"` for 50000000.
pub fn format_crores(value: f64) -> String {
    format!("{:.2} Crores", value / CRORE)
}

/// Build the digest for a normalized analytical view.
///
/// Returns `None` for queries without a digest and for empty views.
pub fn highlights(def: &QueryDefinition, view: &GraphView) -> Option<Highlights> {
    if view.is_empty() {
        return None;
    }

    match def.highlight {
        HighlightStyle::None => None,
        HighlightStyle::TopDirectors => {
            let metric = def.enrichment()?.property;
            Some(Highlights::TopDirectors {
                top_directors: top_directors(view, metric),
            })
        }
        HighlightStyle::Capital { label } => {
            let property = def.ranking?.property;
            let companies = sorted_companies(view, |a, b| desc_numeric(a, b, property))
                .into_iter()
                .map(|company| {
                    let raw = company.properties.get(property).cloned().unwrap_or(Value::Null);
                    let amount = numeric(&raw).unwrap_or(0.0);
                    CompanyHighlight {
                        name: company.label.clone(),
                        ranking: single(label, raw),
                        formatted_capital: Some(format_crores(amount)),
                        directors_count: Some(view.links_into(&company.id).count()),
                        directors: None,
                    }
                })
                .collect();
            Some(Highlights::Companies { companies })
        }
        HighlightStyle::IncorporationDate => {
            let order = def.ranking.map_or(SortOrder::Ascending, |r| r.order);
            let companies = sorted_companies(view, |a, b| by_date(a, b, order))
                .into_iter()
                .map(|company| CompanyHighlight {
                    name: company.label.clone(),
                    ranking: single(
                        "incorporation_date",
                        company.properties.get("inc_date").cloned().unwrap_or(Value::Null),
                    ),
                    formatted_capital: None,
                    directors_count: Some(view.links_into(&company.id).count()),
                    directors: None,
                })
                .collect();
            Some(Highlights::Companies { companies })
        }
        HighlightStyle::DirectorCount => {
            let companies = sorted_companies(view, |a, b| desc_numeric(a, b, "director_count"))
                .into_iter()
                .map(|company| CompanyHighlight {
                    name: company.label.clone(),
                    ranking: single(
                        "director_count",
                        company.properties.get("director_count").cloned().unwrap_or(Value::Null),
                    ),
                    formatted_capital: None,
                    directors_count: None,
                    directors: Some(
                        view.links_into(&company.id)
                            .filter_map(|link| view.node(&link.source))
                            .map(|director| director.label.clone())
                            .collect(),
                    ),
                })
                .collect();
            Some(Highlights::Companies { companies })
        }
    }
}

fn top_directors(view: &GraphView, metric: &str) -> Vec<DirectorHighlight> {
    let mut directors: Vec<&GraphNode> = view
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeKind::Director)
        .collect();
    directors.sort_by(|a, b| desc_numeric(a, b, metric));
    directors
        .into_iter()
        .take(TOP_DIRECTORS)
        .map(|director| DirectorHighlight {
            name: director.label.clone(),
            metric: single(metric, director.properties.get(metric).cloned().unwrap_or(Value::Null)),
        })
        .collect()
}

fn sorted_companies<F>(view: &GraphView, compare: F) -> Vec<&GraphNode>
where
    F: FnMut(&&GraphNode, &&GraphNode) -> Ordering,
{
    let mut companies: Vec<&GraphNode> = view
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeKind::Company)
        .collect();
    // Stable: equal keys keep output order.
    companies.sort_by(compare);
    companies
}

fn desc_numeric(a: &GraphNode, b: &GraphNode, property: &str) -> Ordering {
    let value = |n: &GraphNode| n.properties.get(property).and_then(numeric).unwrap_or(0.0);
    value(b).total_cmp(&value(a))
}

fn by_date(a: &GraphNode, b: &GraphNode, order: SortOrder) -> Ordering {
    let date = |n: &GraphNode| {
        n.properties
            .get("inc_date")
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    match (date(a), date(b)) {
        (Some(x), Some(y)) => match order {
            SortOrder::Ascending => x.cmp(&y),
            SortOrder::Descending => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn single(key: &str, value: Value) -> Properties {
    let mut props = Properties::new();
    props.insert(key.to_string(), value);
    props
}
