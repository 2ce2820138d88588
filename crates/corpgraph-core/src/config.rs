//! Application configuration.
//!
//! Loading order: built-in defaults, then an optional TOML file, then
//! environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CorpGraphError, CorpGraphResult};

/// Connection settings for the graph store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
            max_connections: 8,
            fetch_size: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON file listing the companies of the canonical bulk import.
    pub reference_dataset: PathBuf,
    /// Default row limit of the full-graph view.
    pub full_graph_limit: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            reference_dataset: PathBuf::from("data/all_companies_data.json"),
            full_graph_limit: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(rename = "neo4j")]
    pub graph: GraphConfig,
    pub server: ServerConfig,
    pub data: DataConfig,
}

impl AppConfig {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> CorpGraphResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CorpGraphResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CorpGraphError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> CorpGraphResult<Self> {
        toml::from_str(raw).map_err(|e| CorpGraphError::Config(e.to_string()))
    }

    /// Apply `NEO4J_URI`, `NEO4J_USERNAME`, `NEO4J_PASSWORD`, `PORT` and
    /// `CORPGRAPH_REFERENCE_DATASET` from `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> CorpGraphResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("NEO4J_URI") {
            self.graph.uri = uri;
        }
        if let Some(user) = lookup("NEO4J_USERNAME") {
            self.graph.user = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            self.graph.password = password;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| CorpGraphError::Config(format!("PORT is not a valid port: {}", port)))?;
        }
        if let Some(path) = lookup("CORPGRAPH_REFERENCE_DATASET") {
            self.data.reference_dataset = PathBuf::from(path);
        }
        Ok(())
    }
}
