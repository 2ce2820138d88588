//! corpgraph Core Library
//!
//! Turns heterogeneous graph-query rows (single entities, entities with
//! collected relations, analytical query branches) into one canonical
//! `{nodes, links}` view for the visualization layer.

pub mod accumulator;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod highlights;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod reference;
pub mod representative;

pub use accumulator::{EdgeOutcome, GraphAccumulator};
pub use catalog::{QueryDefinition, QueryType};
pub use config::{AppConfig, DataConfig, GraphConfig, ServerConfig};
pub use error::{CorpGraphError, CorpGraphResult};
pub use highlights::Highlights;
pub use ingest::CompanyDirectorSubmission;
pub use model::{
    AnalyticRow, Classification, CollectedCompany, CollectedDirector, CompanyProfileRow,
    DirectorProfileRow, EntityNode, EntityRelation, GraphEdge, GraphNode, GraphStatistics,
    GraphView, NodeKind, Properties, TripleRow,
};
pub use reference::{ReferenceLoad, ReferenceSet};
