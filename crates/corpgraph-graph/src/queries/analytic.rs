//! Catalog queries.

use anyhow::{Context, Result};
use neo4rs::Query;
use tracing::debug;

use corpgraph_core::{AnalyticRow, QueryType};

use crate::decode;
use crate::GraphClient;

/// Run a catalog query and decode its rows.
pub async fn run(client: &GraphClient, query_type: QueryType) -> Result<Vec<AnalyticRow>> {
    let def = query_type.definition();
    let rows = client
        .query(Query::new(def.cypher.to_string()))
        .await
        .with_context(|| format!("Catalog query '{}' failed", query_type))?;

    debug!(query_type = %query_type, rows = rows.len(), "Catalog query returned");
    Ok(rows.iter().map(|row| decode::analytic_row(row, &def)).collect())
}
