//! The `GraphStore` seam between handlers and Neo4j.

use async_trait::async_trait;
use tracing::error;

use corpgraph_core::{
    AnalyticRow, CompanyDirectorSubmission, CompanyProfileRow, CorpGraphError, CorpGraphResult,
    DirectorProfileRow, EntityNode, QueryType, TripleRow,
};

use crate::client::{GraphClient, GraphCounts};
use crate::queries::{analytic, ingest, lookup};

/// Read and write access to the ownership graph.
///
/// Implementations report every failure as [`CorpGraphError::Store`].
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn ping(&self) -> CorpGraphResult<()>;

    async fn full_graph(&self, limit: usize) -> CorpGraphResult<Vec<TripleRow>>;

    async fn company_profile(&self, cin: &str) -> CorpGraphResult<Option<CompanyProfileRow>>;

    async fn director_profile(&self, din: &str) -> CorpGraphResult<Option<DirectorProfileRow>>;

    async fn companies(&self, limit: Option<usize>) -> CorpGraphResult<Vec<EntityNode>>;

    async fn analytic(&self, query_type: QueryType) -> CorpGraphResult<Vec<AnalyticRow>>;

    async fn upsert_company_director(&self, submission: &CompanyDirectorSubmission) -> CorpGraphResult<()>;

    async fn counts(&self) -> CorpGraphResult<GraphCounts>;
}

fn upstream(operation: &str, err: anyhow::Error) -> CorpGraphError {
    error!(operation, error = %format!("{:#}", err), "Graph store operation failed");
    CorpGraphError::store(operation, format!("{:#}", err))
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn ping(&self) -> CorpGraphResult<()> {
        GraphClient::ping(self).await.map_err(|e| upstream("ping", e))
    }

    async fn full_graph(&self, limit: usize) -> CorpGraphResult<Vec<TripleRow>> {
        lookup::full_graph(self, limit).await.map_err(|e| upstream("full_graph", e))
    }

    async fn company_profile(&self, cin: &str) -> CorpGraphResult<Option<CompanyProfileRow>> {
        lookup::company_profile(self, cin)
            .await
            .map_err(|e| upstream("company_profile", e))
    }

    async fn director_profile(&self, din: &str) -> CorpGraphResult<Option<DirectorProfileRow>> {
        lookup::director_profile(self, din)
            .await
            .map_err(|e| upstream("director_profile", e))
    }

    async fn companies(&self, limit: Option<usize>) -> CorpGraphResult<Vec<EntityNode>> {
        lookup::companies(self, limit).await.map_err(|e| upstream("companies", e))
    }

    async fn analytic(&self, query_type: QueryType) -> CorpGraphResult<Vec<AnalyticRow>> {
        analytic::run(self, query_type)
            .await
            .map_err(|e| upstream(query_type.as_str(), e))
    }

    async fn upsert_company_director(&self, submission: &CompanyDirectorSubmission) -> CorpGraphResult<()> {
        ingest::upsert_company_director(self, submission)
            .await
            .map_err(|e| upstream("upsert_company_director", e))
    }

    async fn counts(&self) -> CorpGraphResult<GraphCounts> {
        self.get_counts().await.map_err(|e| upstream("counts", e))
    }
}
