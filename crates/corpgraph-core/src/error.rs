//! Centralized error types for corpgraph.

use thiserror::Error;

/// Main error type for corpgraph operations.
#[derive(Error, Debug)]
pub enum CorpGraphError {
    #[error("Query type is required")]
    MissingQueryType { available: Vec<&'static str> },

    #[error("Invalid query type: {provided}")]
    UnknownQueryType {
        provided: String,
        available: Vec<&'static str>,
    },

    #[error("Graph store failure during '{operation}': {message}")]
    Store { operation: String, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Reference dataset error: {0}")]
    ReferenceDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for corpgraph operations.
pub type CorpGraphResult<T> = Result<T, CorpGraphError>;

impl CorpGraphError {
    /// Wrap a failure reported by the graph store.
    pub fn store(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Store {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    /// Create a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Stable machine-readable name of the failure category.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingQueryType { .. } => "unknown_query_type",
            Self::UnknownQueryType { .. } => "unknown_query_type",
            Self::Store { .. } => "upstream",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::ReferenceDataset(_) => "reference_dataset",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}
