//! # corpgraph Graph
//!
//! Neo4j adapter for the corporate-ownership graph.
//!
//! Runs the lookup, catalog and ingestion queries and decodes their rows
//! into the shapes the core normalizer consumes.

pub mod client;
pub mod decode;
pub mod queries;
pub mod schema;
pub mod store;

pub use client::{GraphClient, GraphCounts};
pub use store::GraphStore;
