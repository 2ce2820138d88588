//! Cypher queries grouped by read path.

pub mod analytic;
pub mod ingest;
pub mod lookup;
