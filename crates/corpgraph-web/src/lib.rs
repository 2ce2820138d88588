//! corpgraph Web Server
//!
//! Axum router exposing the graph views, the analytical catalog and the
//! ingestion form.

pub mod error;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;
pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        // Graph views
        .route("/graph", get(routes::graph::full_graph))
        .route("/graph/company/{cin}", get(routes::graph::company_by_cin))
        .route("/graph/director/{din}", get(routes::graph::director_by_din))
        .route("/graph/secondary-companies", get(routes::graph::secondary_companies))
        .route("/graph/query", get(routes::query::run_query))
        // Ingestion
        .route("/form/company-director", post(routes::form::submit_company_director));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
