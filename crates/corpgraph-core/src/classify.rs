//! Node classification: `director`, `primary` or `secondary`.

use serde_json::Value;

use crate::model::{Classification, NodeKind, Properties};
use crate::reference::ReferenceSet;

/// Natural-key property checked against the primary identifier set.
pub const NATURAL_KEY: &str = "cin";

/// Classify a node.
///
/// Directors are always `director`. Other nodes are `primary` only when a
/// primary identifier set is supplied and contains the node's CIN.
pub fn classify(
    kind: &NodeKind,
    properties: &Properties,
    primary: Option<&ReferenceSet>,
) -> Classification {
    if *kind == NodeKind::Director {
        return Classification::Director;
    }

    let cin = properties.get(NATURAL_KEY).and_then(Value::as_str);
    match (primary, cin) {
        (Some(set), Some(cin)) if set.contains(cin) => Classification::Primary,
        _ => Classification::Secondary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_cin(cin: &str) -> Properties {
        json!({ "cin": cin }).as_object().cloned().unwrap()
    }

    #[test]
    fn test_director_ignores_reference_set() {
        let set = ReferenceSet::from_cins(["D1"]);
        let props = json!({"din": "D1", "cin": "D1"}).as_object().cloned().unwrap();
        assert_eq!(classify(&NodeKind::Director, &props, Some(&set)), Classification::Director);
        assert_eq!(classify(&NodeKind::Director, &props, None), Classification::Director);
    }

    #[test]
    fn test_primary_requires_membership() {
        let set = ReferenceSet::from_cins(["X1"]);
        assert_eq!(classify(&NodeKind::Company, &with_cin("X1"), Some(&set)), Classification::Primary);
        assert_eq!(classify(&NodeKind::Company, &with_cin("X2"), Some(&set)), Classification::Secondary);
        assert_eq!(classify(&NodeKind::Company, &Properties::new(), Some(&set)), Classification::Secondary);
    }

    #[test]
    fn test_without_reference_everything_is_secondary() {
        assert_eq!(classify(&NodeKind::Company, &with_cin("X1"), None), Classification::Secondary);
        assert_eq!(
            classify(&NodeKind::Other("User".into()), &Properties::new(), None),
            Classification::Secondary
        );
    }
}
