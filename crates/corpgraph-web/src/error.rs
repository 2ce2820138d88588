//! Mapping of core errors onto HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use corpgraph_core::{CorpGraphError, QueryType};

/// JSON error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_types: Option<Vec<&'static str>>,
}

#[derive(Debug)]
pub struct ApiError(pub CorpGraphError);

impl From<CorpGraphError> for ApiError {
    fn from(err: CorpGraphError) -> Self {
        Self(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(CorpGraphError::Validation(vec![rejection.body_text()]))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(CorpGraphError::Validation(vec![rejection.body_text()]))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CorpGraphError::MissingQueryType { .. }
            | CorpGraphError::UnknownQueryType { .. }
            | CorpGraphError::Validation(_) => StatusCode::BAD_REQUEST,
            CorpGraphError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let mut body = ErrorBody {
            error: self.0.to_string(),
            category: self.0.category(),
            details: None,
            query_type: None,
            available_types: None,
        };

        match &self.0 {
            CorpGraphError::MissingQueryType { available } => {
                body.available_types = Some(available.clone());
            }
            CorpGraphError::UnknownQueryType { provided, available } => {
                body.query_type = Some(provided.clone());
                body.available_types = Some(available.clone());
            }
            CorpGraphError::Store { operation, message } => {
                body.error = "Graph store request failed".to_string();
                body.details = Some(Value::String(message.clone()));
                body.query_type = operation
                    .parse::<QueryType>()
                    .ok()
                    .map(|q| q.as_str().to_string());
            }
            CorpGraphError::Validation(errors) => {
                body.error = "Validation failed".to_string();
                body.details = Some(Value::from(errors.clone()));
            }
            _ => {}
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
