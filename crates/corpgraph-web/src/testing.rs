//! In-memory `GraphStore` and request helpers for router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, http::StatusCode, Router};
use serde_json::Value;
use tower::ServiceExt;

use corpgraph_core::{
    AnalyticRow, CompanyDirectorSubmission, CompanyProfileRow, CorpGraphError, CorpGraphResult,
    DataConfig, DirectorProfileRow, EntityNode, QueryType, TripleRow,
};
use corpgraph_graph::{GraphCounts, GraphStore};

use crate::{create_router, AppState};

#[derive(Default)]
pub struct FakeStore {
    pub triples: Vec<TripleRow>,
    pub companies: Vec<EntityNode>,
    pub company_profiles: HashMap<String, CompanyProfileRow>,
    pub director_profiles: HashMap<String, DirectorProfileRow>,
    pub analytic: HashMap<QueryType, Vec<AnalyticRow>>,
    pub fail: bool,
    pub calls: AtomicUsize,
    pub submissions: Mutex<Vec<CompanyDirectorSubmission>>,
}

impl FakeStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, operation: &str) -> CorpGraphResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(CorpGraphError::store(operation, "connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GraphStore for FakeStore {
    async fn ping(&self) -> CorpGraphResult<()> {
        self.enter("ping")
    }

    async fn full_graph(&self, limit: usize) -> CorpGraphResult<Vec<TripleRow>> {
        self.enter("full_graph")?;
        Ok(self.triples.iter().take(limit).cloned().collect())
    }

    async fn company_profile(&self, cin: &str) -> CorpGraphResult<Option<CompanyProfileRow>> {
        self.enter("company_profile")?;
        Ok(self.company_profiles.get(cin).cloned())
    }

    async fn director_profile(&self, din: &str) -> CorpGraphResult<Option<DirectorProfileRow>> {
        self.enter("director_profile")?;
        Ok(self.director_profiles.get(din).cloned())
    }

    async fn companies(&self, limit: Option<usize>) -> CorpGraphResult<Vec<EntityNode>> {
        self.enter("companies")?;
        let limit = limit.unwrap_or(usize::MAX);
        Ok(self.companies.iter().take(limit).cloned().collect())
    }

    async fn analytic(&self, query_type: QueryType) -> CorpGraphResult<Vec<AnalyticRow>> {
        self.enter(query_type.as_str())?;
        Ok(self.analytic.get(&query_type).cloned().unwrap_or_default())
    }

    async fn upsert_company_director(&self, submission: &CompanyDirectorSubmission) -> CorpGraphResult<()> {
        self.enter("upsert_company_director")?;
        if let Ok(mut stored) = self.submissions.lock() {
            stored.push(submission.clone());
        }
        Ok(())
    }

    async fn counts(&self) -> CorpGraphResult<GraphCounts> {
        self.enter("counts")?;
        Ok(GraphCounts::default())
    }
}

/// Router over `store`, reading the reference dataset from `reference`.
pub fn router(store: Arc<FakeStore>, reference: &std::path::Path) -> Router {
    let data = DataConfig {
        reference_dataset: reference.to_path_buf(),
        ..DataConfig::default()
    };
    create_router(AppState::new(store, data))
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
