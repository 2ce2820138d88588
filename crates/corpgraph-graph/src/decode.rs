//! Conversion of neo4rs rows into the core row shapes.

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use neo4rs::{Node, Relation, Row};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use corpgraph_core::{
    AnalyticRow, CollectedCompany, CollectedDirector, CompanyProfileRow, DirectorProfileRow,
    EntityNode, EntityRelation, Properties, QueryDefinition, TripleRow,
};

/// Anything with a bolt property map.
trait PropertySource {
    fn property_keys(&self) -> Vec<&str>;
    fn json(&self, key: &str) -> Option<Value>;
    fn date(&self, key: &str) -> Option<NaiveDate>;
    fn datetime(&self, key: &str) -> Option<NaiveDateTime>;
}

impl PropertySource for Node {
    fn property_keys(&self) -> Vec<&str> {
        self.keys()
    }
    fn json(&self, key: &str) -> Option<Value> {
        self.get::<Value>(key).ok()
    }
    fn date(&self, key: &str) -> Option<NaiveDate> {
        self.get::<NaiveDate>(key).ok()
    }
    fn datetime(&self, key: &str) -> Option<NaiveDateTime> {
        self.get::<NaiveDateTime>(key).ok()
    }
}

impl PropertySource for Relation {
    fn property_keys(&self) -> Vec<&str> {
        self.keys()
    }
    fn json(&self, key: &str) -> Option<Value> {
        self.get::<Value>(key).ok()
    }
    fn date(&self, key: &str) -> Option<NaiveDate> {
        self.get::<NaiveDate>(key).ok()
    }
    fn datetime(&self, key: &str) -> Option<NaiveDateTime> {
        self.get::<NaiveDateTime>(key).ok()
    }
}

/// Temporal values come back as ISO strings so they compare lexically.
fn properties(source: &impl PropertySource) -> Properties {
    let mut props = Properties::new();
    for key in source.property_keys() {
        let value = source
            .date(key)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .or_else(|| {
                source
                    .datetime(key)
                    .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()))
            })
            .or_else(|| source.json(key));
        match value {
            Some(value) => {
                props.insert(key.to_string(), value);
            }
            None => debug!(key, "Skipping property with unsupported bolt type"),
        }
    }
    props
}

pub fn entity(node: &Node) -> EntityNode {
    EntityNode {
        id: node.id(),
        labels: node.labels().into_iter().map(str::to_string).collect(),
        properties: properties(node),
    }
}

pub fn relation(rel: &Relation) -> EntityRelation {
    EntityRelation {
        id: rel.id(),
        start_id: rel.start_node_id(),
        end_id: rel.end_node_id(),
        rel_type: rel.typ().to_string(),
        properties: properties(rel),
    }
}

fn required<T: DeserializeOwned>(row: &Row, key: &str) -> Result<T> {
    row.get::<T>(key)
        .map_err(|e| anyhow!("Row is missing column '{}': {:?}", key, e))
}

fn optional_node(row: &Row, key: &str) -> Option<Node> {
    row.get::<Option<Node>>(key).ok().flatten()
}

/// Scalar column as JSON; temporal aggregates become ISO strings.
fn scalar(row: &Row, key: &str) -> Option<Value> {
    if let Ok(date) = row.get::<NaiveDate>(key) {
        return Some(Value::String(date.format("%Y-%m-%d").to_string()));
    }
    row.get::<Value>(key).ok().filter(|v| !v.is_null())
}

/// `RETURN n, r, m`
pub fn triple_row(row: &Row) -> Result<TripleRow> {
    let source: Node = required(row, "n")?;
    let relationship: Relation = required(row, "r")?;
    let target: Node = required(row, "m")?;
    Ok(TripleRow {
        source: entity(&source),
        relationship: relation(&relationship),
        target: entity(&target),
    })
}

/// `RETURN c, d, r, <aggregate>`; every column is optional.
pub fn analytic_row(row: &Row, def: &QueryDefinition) -> AnalyticRow {
    AnalyticRow {
        company: optional_node(row, "c").map(|n| entity(&n)),
        director: optional_node(row, "d").map(|n| entity(&n)),
        relationship: row
            .get::<Option<Relation>>("r")
            .ok()
            .flatten()
            .map(|r| relation(&r)),
        aggregate: def.aggregate_column().and_then(|column| scalar(row, column)),
    }
}

/// `RETURN c, collect({...}) AS directors`
pub fn company_profile_row(row: &Row) -> Result<CompanyProfileRow> {
    let company: Node = required(row, "c")?;
    let directors: Vec<CollectedDirector> = required(row, "directors")?;
    Ok(CompanyProfileRow {
        company: entity(&company),
        directors,
    })
}

/// `RETURN d, collect({...}) AS companies`
pub fn director_profile_row(row: &Row) -> Result<DirectorProfileRow> {
    let director: Node = required(row, "d")?;
    let companies: Vec<CollectedCompany> = required(row, "companies")?;
    Ok(DirectorProfileRow {
        director: entity(&director),
        companies,
    })
}

/// `RETURN c`
pub fn company_row(row: &Row) -> Result<EntityNode> {
    let company: Node = required(row, "c")?;
    Ok(entity(&company))
}
