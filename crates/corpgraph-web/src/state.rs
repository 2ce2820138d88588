//! Application state.

use std::sync::Arc;

use corpgraph_core::reference::{load_or_degrade, ReferenceLoad};
use corpgraph_core::DataConfig;
use corpgraph_graph::GraphStore;
use tokio::task::JoinError;
use tracing::warn;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GraphStore>,
    pub data: Arc<DataConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn GraphStore>, data: DataConfig) -> Self {
        Self {
            store,
            data: Arc::new(data),
        }
    }

    /// Read the reference dataset for one request.
    pub async fn load_reference(&self) -> ReferenceLoad {
        let path = self.data.reference_dataset.clone();
        settle_reference(tokio::task::spawn_blocking(move || load_or_degrade(&path)).await)
    }
}

fn settle_reference(joined: Result<ReferenceLoad, JoinError>) -> ReferenceLoad {
    match joined {
        Ok(load) => load,
        Err(e) => {
            warn!(error = %e, "Reference dataset task failed, classifying companies as secondary");
            ReferenceLoad::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_reference_task_degrades() {
        let joined = tokio::task::spawn_blocking(|| -> ReferenceLoad { panic!("reader crashed") }).await;
        assert!(joined.is_err());

        let load = settle_reference(joined);
        assert!(load.degraded());
        assert_eq!(load.original_count(), 0);
    }
}
