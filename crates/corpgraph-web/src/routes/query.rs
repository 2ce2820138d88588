//! Analytical catalog queries.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use corpgraph_core::highlights::highlights;
use corpgraph_core::normalize::normalize_analytic;
use corpgraph_core::{GraphView, Highlights, QueryType};

use crate::error::ApiError;
use crate::state::AppState;

pub const NO_DATA_MESSAGE: &str = "No data found for this query";

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(rename = "type")]
    pub query_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query_type: &'static str,
    pub description: &'static str,
    #[serde(flatten)]
    pub view: GraphView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Highlights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// `GET /api/graph/query?type=<discriminator>`
///
/// The discriminator is checked before the store is touched.
pub async fn run_query(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query_type = QueryType::parse_param(params.query_type.as_deref())?;
    let def = query_type.definition();

    let rows = state.store.analytic(query_type).await?;
    let view = normalize_analytic(query_type, &rows);
    let highlights = highlights(&def, &view);

    info!(
        query_type = %query_type,
        rows = rows.len(),
        nodes = view.statistics.total_nodes,
        links = view.statistics.total_links,
        "Ran catalog query"
    );

    Ok(Json(QueryResponse {
        query_type: query_type.as_str(),
        description: def.description,
        message: view.is_empty().then_some(NO_DATA_MESSAGE),
        view,
        highlights,
    }))
}
