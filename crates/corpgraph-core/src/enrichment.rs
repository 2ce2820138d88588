//! Query-specific property enrichment.
//!
//! Ranking aggregates are computed by the query, not stored on the entity.
//! This table is the single place that says which aggregate lands on which
//! property of which kind of node.

use serde_json::Value;

use crate::accumulator::GraphAccumulator;
use crate::catalog::{QueryType, Subject};

/// One enrichment rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrichment {
    /// Aggregate column in the row.
    pub column: &'static str,
    /// Property written on the subject node.
    pub property: &'static str,
    pub subject: Subject,
}

const ENRICHMENTS: &[(QueryType, Enrichment)] = &[
    (
        QueryType::TopPaidDefence,
        Enrichment { column: "max_paid_capital", property: "paid_capital", subject: Subject::Company },
    ),
    (
        QueryType::OldestTrading,
        Enrichment { column: "earliest_date", property: "inc_date", subject: Subject::Company },
    ),
    (
        QueryType::MostConnectedDirectors,
        Enrichment {
            column: "unique_company_count",
            property: "connection_count",
            subject: Subject::Director,
        },
    ),
    (
        QueryType::BusinessCompanies,
        Enrichment { column: "max_paid_capital", property: "paid_capital", subject: Subject::Company },
    ),
    (
        QueryType::DefenceByDirectors,
        Enrichment { column: "director_count", property: "director_count", subject: Subject::Company },
    ),
    (
        QueryType::UnionGovDefence,
        Enrichment { column: "max_auth_capital", property: "auth_capital", subject: Subject::Company },
    ),
    (
        QueryType::RecentDefence,
        Enrichment { column: "latest_inc_date", property: "inc_date", subject: Subject::Company },
    ),
    (
        QueryType::DirectorsByCapital,
        Enrichment {
            column: "total_authorized_capital",
            property: "total_authorized_capital",
            subject: Subject::Director,
        },
    ),
];

/// Enrichment rule for a discriminator, if it has one.
pub fn enrichment_for(query_type: QueryType) -> Option<&'static Enrichment> {
    ENRICHMENTS
        .iter()
        .find(|(q, _)| *q == query_type)
        .map(|(_, e)| e)
}

/// Write an aggregate onto a registered node.
///
/// No-op (returns false) when the aggregate is absent or null, the node is
/// not registered, or its kind does not match the rule's subject.
pub fn apply(
    acc: &mut GraphAccumulator,
    rule: &Enrichment,
    node_id: &str,
    aggregate: Option<&Value>,
) -> bool {
    let Some(value) = aggregate.filter(|v| !v.is_null()) else {
        return false;
    };
    let subject_matches = acc
        .node_kind(node_id)
        .is_some_and(|kind| rule.subject.matches(kind));
    subject_matches && acc.set_property(node_id, rule.property, value.clone())
}
