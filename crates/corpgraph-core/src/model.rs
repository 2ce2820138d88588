//! Row shapes consumed from the graph store and the canonical view handed
//! to the presentation layer.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Property bag of a node or relationship.
pub type Properties = Map<String, Value>;

// ============================================================
// STORE-SIDE ENTITIES
// ============================================================

/// A node as returned by the graph store.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    /// Store-wide native identity.
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: Properties,
}

impl EntityNode {
    pub fn new(id: i64, labels: &[&str]) -> Self {
        Self {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: Properties::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_labels(&self.labels)
    }

    /// String view of a property, if it holds a string.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.property_str("name").filter(|n| !n.is_empty())
    }

    /// Identity as used in the canonical view.
    pub fn view_id(&self) -> String {
        self.id.to_string()
    }
}

/// A relationship as returned by the graph store.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRelation {
    pub id: i64,
    pub start_id: i64,
    pub end_id: i64,
    pub rel_type: String,
    pub properties: Properties,
}

impl EntityRelation {
    pub fn new(id: i64, start_id: i64, end_id: i64, rel_type: &str) -> Self {
        Self {
            id,
            start_id,
            end_id,
            rel_type: rel_type.to_string(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

/// A director entry collected alongside a company (`collect({...})`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedDirector {
    pub name: Option<String>,
    pub din: Option<String>,
    pub designation: Option<String>,
    pub director_id: Option<i64>,
}

/// A company entry collected alongside a director.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedCompany {
    pub name: Option<String>,
    pub cin: Option<String>,
    pub designation: Option<String>,
    pub company_id: Option<i64>,
}

// ============================================================
// ROW SHAPES
// ============================================================

/// `MATCH (n)-[r]->(m) RETURN n, r, m`
#[derive(Debug, Clone, PartialEq)]
pub struct TripleRow {
    pub source: EntityNode,
    pub relationship: EntityRelation,
    pub target: EntityNode,
}

/// One row of an analytical catalog query: `RETURN c, d, r, <aggregate>`.
///
/// Every entity field may be absent because the queries use OPTIONAL joins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticRow {
    pub company: Option<EntityNode>,
    pub director: Option<EntityNode>,
    pub relationship: Option<EntityRelation>,
    pub aggregate: Option<Value>,
}

/// A company with its directors collected into a list.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyProfileRow {
    pub company: EntityNode,
    pub directors: Vec<CollectedDirector>,
}

impl CompanyProfileRow {
    /// Directors that actually exist; the OPTIONAL join yields one nameless
    /// placeholder when the company has none.
    pub fn named_directors(&self) -> impl Iterator<Item = &CollectedDirector> {
        self.directors
            .iter()
            .filter(|d| d.name.as_deref().is_some_and(|n| !n.is_empty()))
    }
}

/// A director with the companies it directs collected into a list.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorProfileRow {
    pub director: EntityNode,
    pub companies: Vec<CollectedCompany>,
}

impl DirectorProfileRow {
    pub fn named_companies(&self) -> impl Iterator<Item = &CollectedCompany> {
        self.companies
            .iter()
            .filter(|c| c.name.as_deref().is_some_and(|n| !n.is_empty()))
    }
}

// ============================================================
// CANONICAL VIEW
// ============================================================

/// Kind of a node, derived from its labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Company,
    Director,
    Collection,
    Other(String),
}

impl NodeKind {
    /// Resolve the kind from a label set. `Director` wins over `Company`
    /// since label order is not guaranteed by the store.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let has = |wanted: &str| labels.iter().any(|l| l.as_ref() == wanted);
        if has("Director") {
            Self::Director
        } else if has("Company") {
            Self::Company
        } else if has("Collection") {
            Self::Collection
        } else {
            match labels.first() {
                Some(l) if !l.as_ref().is_empty() => Self::Other(l.as_ref().to_string()),
                _ => Self::Other("Unknown".to_string()),
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Company => "Company",
            Self::Director => "Director",
            Self::Collection => "Collection",
            Self::Other(label) => label,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Other(l) if l == "Unknown")
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Visual classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Director,
    Primary,
    Secondary,
}

/// A node of the canonical view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "nodeType")]
    pub node_type: NodeKind,
    #[serde(rename = "type")]
    pub classification: Classification,
    pub properties: Properties,
}

/// A link of the canonical view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub properties: Properties,
}

/// Summary counts attached to every view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_links: usize,
    pub companies: usize,
    pub directors: usize,
    pub primary: usize,
    pub secondary: usize,
}

/// The normalizer's output: `{nodes, links, statistics}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphEdge>,
    pub statistics: GraphStatistics,
}

impl GraphView {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Links whose target is the given node.
    pub fn links_into<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.links.iter().filter(move |l| l.target == id)
    }
}

/// Display label for a node: its name, else its kind, else "Unknown".
pub fn display_label(kind: &NodeKind, properties: &Properties) -> String {
    match properties.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ if !kind.as_str().is_empty() => kind.as_str().to_string(),
        _ => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_prefers_director_label() {
        assert_eq!(NodeKind::from_labels(&["Company", "MasterCompany"]), NodeKind::Company);
        assert_eq!(NodeKind::from_labels(&["MasterCompany", "Company"]), NodeKind::Company);
        assert_eq!(NodeKind::from_labels(&["Person", "Director"]), NodeKind::Director);
        assert_eq!(NodeKind::from_labels(&["User"]), NodeKind::Other("User".to_string()));
        assert!(NodeKind::from_labels::<&str>(&[]).is_unknown());
    }

    #[test]
    fn test_display_label_falls_back_to_kind() {
        let mut props = Properties::new();
        assert_eq!(display_label(&NodeKind::Company, &props), "Company");
        props.insert("name".into(), Value::String(String::new()));
        assert_eq!(display_label(&NodeKind::Director, &props), "Director");
        props.insert("name".into(), Value::String("Acme".into()));
        assert_eq!(display_label(&NodeKind::Company, &props), "Acme");
    }

    #[test]
    fn test_node_serializes_contract_keys() {
        let node = GraphNode {
            id: "7".into(),
            label: "Jane".into(),
            node_type: NodeKind::Director,
            classification: Classification::Director,
            properties: Properties::new(),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["nodeType"], "Director");
        assert_eq!(json["type"], "director");
        assert_eq!(json["id"], "7");
    }

    #[test]
    fn test_named_directors_skips_placeholder() {
        let row = CompanyProfileRow {
            company: EntityNode::new(1, &["Company"]),
            directors: vec![
                CollectedDirector::default(),
                CollectedDirector {
                    name: Some("Jane".into()),
                    ..Default::default()
                },
            ],
        };
        assert_eq!(row.named_directors().count(), 1);
    }
}
