//! Graph view route handlers.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use corpgraph_core::normalize::{
    normalize_companies, normalize_company_profile, normalize_director_profile, normalize_full_graph,
};
use corpgraph_core::{Classification, CorpGraphError, GraphView, NodeKind, Properties};

use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound on `?limit=` for the full graph.
pub const MAX_FULL_GRAPH_LIMIT: usize = 5000;

/// Company listing size when the reference dataset is unavailable.
const DEGRADED_LISTING_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct FullGraphParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FullGraphResponse {
    #[serde(flatten)]
    pub view: GraphView,
    pub degraded_classification: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Properties of the looked-up company or director.
    pub subject: Properties,
    pub found: bool,
    #[serde(flatten)]
    pub view: GraphView,
}

#[derive(Debug, Serialize)]
pub struct SecondaryCompaniesResponse {
    pub secondary_companies: Vec<Properties>,
    pub count: usize,
    pub original_count: usize,
    pub degraded_classification: bool,
}

pub async fn full_graph(
    State(state): State<AppState>,
    params: Result<Query<FullGraphParams>, QueryRejection>,
) -> Result<Json<FullGraphResponse>, ApiError> {
    let Query(params) = params?;
    let limit = params
        .limit
        .unwrap_or(state.data.full_graph_limit)
        .clamp(1, MAX_FULL_GRAPH_LIMIT);

    let reference = state.load_reference().await;
    let rows = state.store.full_graph(limit).await?;
    let view = normalize_full_graph(&rows, reference.set.as_ref());

    info!(
        rows = rows.len(),
        nodes = view.statistics.total_nodes,
        links = view.statistics.total_links,
        degraded = reference.degraded(),
        "Served full graph"
    );

    Ok(Json(FullGraphResponse {
        view,
        degraded_classification: reference.degraded(),
    }))
}

pub async fn company_by_cin(
    State(state): State<AppState>,
    Path(cin): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let row = state
        .store
        .company_profile(&cin)
        .await?
        .ok_or_else(|| CorpGraphError::not_found("Company"))?;

    Ok(Json(ProfileResponse {
        subject: row.company.properties.clone(),
        found: true,
        view: normalize_company_profile(&row),
    }))
}

pub async fn director_by_din(
    State(state): State<AppState>,
    Path(din): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let row = state
        .store
        .director_profile(&din)
        .await?
        .ok_or_else(|| CorpGraphError::not_found("Director"))?;

    Ok(Json(ProfileResponse {
        subject: row.director.properties.clone(),
        found: true,
        view: normalize_director_profile(&row),
    }))
}

/// Companies with a CIN outside the reference dataset.
pub async fn secondary_companies(
    State(state): State<AppState>,
) -> Result<Json<SecondaryCompaniesResponse>, ApiError> {
    let reference = state.load_reference().await;
    let limit = reference.degraded().then_some(DEGRADED_LISTING_LIMIT);
    let companies = state.store.companies(limit).await?;
    let view = normalize_companies(&companies, reference.set.as_ref());

    let secondary_companies: Vec<Properties> = view
        .nodes
        .into_iter()
        .filter(|n| n.node_type == NodeKind::Company && n.classification == Classification::Secondary)
        .filter(|n| n.properties.get("cin").and_then(Value::as_str).is_some_and(|c| !c.is_empty()))
        .map(|n| n.properties)
        .collect();

    Ok(Json(SecondaryCompaniesResponse {
        count: secondary_companies.len(),
        secondary_companies,
        original_count: reference.original_count(),
        degraded_classification: reference.degraded(),
    }))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use corpgraph_core::{
        CollectedDirector, CompanyProfileRow, DirectorProfileRow, EntityNode, EntityRelation, TripleRow,
    };

    use crate::testing::{get, router, send, FakeStore};

    fn acme() -> EntityNode {
        EntityNode::new(1, &["Company"])
            .with_property("name", "Acme")
            .with_property("cin", "X1")
    }

    fn jane() -> EntityNode {
        EntityNode::new(2, &["Director"])
            .with_property("name", "Jane")
            .with_property("din", "D1")
    }

    fn reference_file(cins: &[&str]) -> tempfile::NamedTempFile {
        let entries: Vec<_> = cins.iter().map(|c| serde_json::json!({ "cin": c })).collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::json!({ "Delhi": entries })).unwrap();
        file
    }

    fn triple_store() -> FakeStore {
        FakeStore {
            triples: vec![TripleRow {
                source: jane(),
                relationship: EntityRelation::new(10, 2, 1, "DIRECTED").with_property("designation", "MD"),
                target: acme(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_full_graph_with_reference() {
        let reference = reference_file(&["X1"]);
        let app = router(Arc::new(triple_store()), reference.path());
        let (status, body) = send(app, get("/api/graph")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["degraded_classification"], false);
        assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(body["links"][0]["source"], "2");
        assert_eq!(body["links"][0]["target"], "1");
        assert_eq!(body["statistics"]["primary"], 1);
    }

    #[tokio::test]
    async fn test_full_graph_degrades_without_reference() {
        let app = router(Arc::new(triple_store()), Path::new("/nonexistent/companies.json"));
        let (status, body) = send(app, get("/api/graph?limit=50")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["degraded_classification"], true);
        let nodes = body["nodes"].as_array().unwrap();
        assert!(!nodes.is_empty());
        for node in nodes {
            let expected = if node["nodeType"] == "Director" { "director" } else { "secondary" };
            assert_eq!(node["type"], expected);
        }
    }

    #[tokio::test]
    async fn test_full_graph_upstream_failure() {
        let store = FakeStore {
            fail: true,
            ..Default::default()
        };
        let app = router(Arc::new(store), Path::new("absent.json"));
        let (status, body) = send(app, get("/api/graph")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["category"], "upstream");
    }

    #[tokio::test]
    async fn test_full_graph_rejects_non_numeric_limit() {
        let store = Arc::new(triple_store());
        let app = router(store.clone(), Path::new("absent.json"));
        let (status, body) = send(app, get("/api/graph?limit=abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["category"], "validation");
        assert!(body["details"][0].as_str().is_some_and(|d| !d.is_empty()));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_company_profile_found_and_missing() {
        let mut store = FakeStore::default();
        store.company_profiles.insert(
            "X1".into(),
            CompanyProfileRow {
                company: acme(),
                directors: vec![
                    CollectedDirector {
                        name: Some("Jane".into()),
                        din: Some("D1".into()),
                        designation: Some("MD".into()),
                        director_id: Some(2),
                    },
                    CollectedDirector::default(),
                ],
            },
        );
        let store = Arc::new(store);

        let (status, body) = send(router(store.clone(), Path::new("absent.json")), get("/api/graph/company/X1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["found"], true);
        assert_eq!(body["subject"]["cin"], "X1");
        assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(body["links"][0]["properties"]["designation"], "MD");

        let (status, body) = send(router(store, Path::new("absent.json")), get("/api/graph/company/NOPE")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["category"], "not_found");
    }

    #[tokio::test]
    async fn test_director_profile() {
        let mut store = FakeStore::default();
        store.director_profiles.insert(
            "D1".into(),
            DirectorProfileRow {
                director: jane(),
                companies: vec![],
            },
        );
        let app = router(Arc::new(store), Path::new("absent.json"));
        let (status, body) = send(app, get("/api/graph/director/D1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject"]["name"], "Jane");
        assert_eq!(body["nodes"][0]["type"], "director");
    }

    #[tokio::test]
    async fn test_secondary_companies() {
        let reference = reference_file(&["X1"]);
        let store = FakeStore {
            companies: vec![
                acme(),
                EntityNode::new(3, &["Company"]).with_property("cin", "Y2"),
                EntityNode::new(4, &["Company"]).with_property("name", "No CIN"),
            ],
            ..Default::default()
        };
        let app = router(Arc::new(store), reference.path());
        let (status, body) = send(app, get("/api/graph/secondary-companies")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["original_count"], 1);
        assert_eq!(body["secondary_companies"][0]["cin"], "Y2");
        assert_eq!(body["degraded_classification"], false);
    }
}
