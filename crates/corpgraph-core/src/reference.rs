//! Reference dataset of primary companies.
//!
//! The dataset maps a category key (the state a company was sourced from)
//! to a list of company descriptors; each descriptor may carry a `cin`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CorpGraphError, CorpGraphResult};

/// CINs of companies that came from the canonical bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    cins: HashSet<String>,
}

impl ReferenceSet {
    pub fn from_cins<I, S>(cins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cins: cins.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the dataset JSON, collecting every non-empty `cin`.
    pub fn from_json_str(raw: &str) -> CorpGraphResult<Self> {
        let categories: HashMap<String, Vec<Value>> = serde_json::from_str(raw)
            .map_err(|e| CorpGraphError::ReferenceDataset(e.to_string()))?;

        let cins = categories
            .values()
            .flatten()
            .filter_map(|entry| entry.get("cin").and_then(Value::as_str))
            .filter(|cin| !cin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { cins })
    }

    pub fn load(path: &Path) -> CorpGraphResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CorpGraphError::ReferenceDataset(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn contains(&self, cin: &str) -> bool {
        self.cins.contains(cin)
    }

    pub fn len(&self) -> usize {
        self.cins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cins.is_empty()
    }
}

/// Outcome of loading the reference dataset for one request.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLoad {
    pub set: Option<ReferenceSet>,
}

impl ReferenceLoad {
    /// True when classification runs without a primary identifier set.
    pub fn degraded(&self) -> bool {
        self.set.is_none()
    }

    pub fn original_count(&self) -> usize {
        self.set.as_ref().map_or(0, ReferenceSet::len)
    }
}

/// Load the dataset, degrading to "no primary set" on any failure.
pub fn load_or_degrade(path: &Path) -> ReferenceLoad {
    match ReferenceSet::load(path) {
        Ok(set) => {
            debug!(path = %path.display(), cins = set.len(), "Loaded reference dataset");
            ReferenceLoad { set: Some(set) }
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Reference dataset unavailable; classifying every company as secondary"
            );
            ReferenceLoad { set: None }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DATASET: &str = r#"{
        "Delhi": [
            {"cin": "U1", "company_name": "Acme"},
            {"company_name": "No CIN"},
            {"cin": ""}
        ],
        "Goa": [{"cin": "U2"}]
    }"#;

    #[test]
    fn test_parse_collects_cins_across_categories() {
        let set = ReferenceSet::from_json_str(DATASET).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("U1"));
        assert!(set.contains("U2"));
        assert!(!set.contains(""));
    }

    #[test]
    fn test_malformed_dataset_is_an_error() {
        let err = ReferenceSet::from_json_str("[1, 2, 3]").unwrap_err();
        assert_eq!(err.category(), "reference_dataset");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();

        let load = load_or_degrade(file.path());
        assert!(!load.degraded());
        assert_eq!(load.original_count(), 2);
    }

    #[test]
    fn test_missing_file_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let load = load_or_degrade(&dir.path().join("absent.json"));
        assert!(load.degraded());
        assert_eq!(load.original_count(), 0);
    }
}
