//! Neo4j connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use corpgraph_core::GraphConfig;

/// Client for the ownership graph in Neo4j.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds the pool; the `RETURN 1` ping forces a
    /// real bolt handshake so an unreachable server fails here.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        let client = Self { graph };
        client.ping().await?;
        debug!(uri = %config.uri, db = %config.database, "Connected to Neo4j");
        Ok(client)
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<()> {
        self.graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph.run(query).await.context("Neo4j query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return results as rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await
            .context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j row")? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a Cypher query and return a single scalar value.
    pub async fn query_scalar<T: DeserializeOwned>(&self, query: Query, field: &str) -> Result<Option<T>> {
        let rows = self.query(query).await?;
        if let Some(row) = rows.into_iter().next() {
            let val: T = row.get(field)
                .map_err(|e| anyhow::anyhow!("Failed to get field '{}': {:?}", field, e))?;
            Ok(Some(val))
        } else {
            Ok(None)
        }
    }

    /// Run every statement in one transaction; nothing is committed if any
    /// statement fails.
    pub async fn run_in_transaction(&self, queries: Vec<Query>) -> Result<()> {
        let count = queries.len();
        let mut txn = self.graph.start_txn().await
            .context("Failed to start Neo4j transaction")?;

        for query in queries {
            if let Err(e) = txn.run(query).await {
                if let Err(rollback) = txn.rollback().await {
                    warn!(error = %rollback, "Neo4j transaction rollback failed");
                }
                return Err(e).context("Neo4j transaction statement failed");
            }
        }

        txn.commit().await.context("Failed to commit Neo4j transaction")?;
        debug!(statements = count, "Committed Neo4j transaction");
        Ok(())
    }

    /// Get node and relationship counts for status display.
    pub async fn get_counts(&self) -> Result<GraphCounts> {
        let count = |cypher: &str| Query::new(cypher.to_string());

        let companies: i64 = self
            .query_scalar(count("MATCH (c:Company) RETURN count(c) as count"), "count")
            .await?
            .unwrap_or(0);
        let directors: i64 = self
            .query_scalar(count("MATCH (d:Director) RETURN count(d) as count"), "count")
            .await?
            .unwrap_or(0);
        let nodes: i64 = self
            .query_scalar(count("MATCH (n) RETURN count(n) as count"), "count")
            .await?
            .unwrap_or(0);
        let relationships: i64 = self
            .query_scalar(count("MATCH ()-[r]->() RETURN count(r) as count"), "count")
            .await?
            .unwrap_or(0);

        Ok(GraphCounts {
            nodes: nodes as usize,
            relationships: relationships as usize,
            companies: companies as usize,
            directors: directors as usize,
        })
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
    pub companies: usize,
    pub directors: usize,
}
