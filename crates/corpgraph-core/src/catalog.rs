//! Catalog of the canned analytical queries.
//!
//! Each discriminator names one Cypher query plus the metadata the
//! normalizer needs to turn its rows into a view: which entity is the
//! subject, how candidate rows are grouped, and how the representative of
//! a group is ranked. Group queries return every candidate of each kept
//! group; picking the representative happens in [`crate::representative`].

use std::fmt;
use std::str::FromStr;

use crate::enrichment::{enrichment_for, Enrichment};
use crate::error::CorpGraphError;
use crate::model::NodeKind;

/// Analytical query discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    TopPaidDefence,
    OldestTrading,
    MostConnectedDirectors,
    BusinessCompanies,
    NonGovDefence,
    DefenceByDirectors,
    UnionGovDefence,
    ElectronicsCompanies,
    RecentDefence,
    DirectorsByCapital,
}

impl QueryType {
    pub const ALL: [QueryType; 10] = [
        QueryType::TopPaidDefence,
        QueryType::OldestTrading,
        QueryType::MostConnectedDirectors,
        QueryType::BusinessCompanies,
        QueryType::NonGovDefence,
        QueryType::DefenceByDirectors,
        QueryType::UnionGovDefence,
        QueryType::ElectronicsCompanies,
        QueryType::RecentDefence,
        QueryType::DirectorsByCapital,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopPaidDefence => "top-paid-defence",
            Self::OldestTrading => "oldest-trading",
            Self::MostConnectedDirectors => "most-connected-directors",
            Self::BusinessCompanies => "business-companies",
            Self::NonGovDefence => "non-gov-defence",
            Self::DefenceByDirectors => "defence-by-directors",
            Self::UnionGovDefence => "union-gov-defence",
            Self::ElectronicsCompanies => "electronics-companies",
            Self::RecentDefence => "recent-defence",
            Self::DirectorsByCapital => "directors-by-capital",
        }
    }

    /// Every valid discriminator, in catalog order.
    pub fn available() -> Vec<&'static str> {
        Self::ALL.iter().map(|q| q.as_str()).collect()
    }

    /// Parse an optional discriminator, distinguishing "missing" from "unknown".
    pub fn parse_param(value: Option<&str>) -> Result<Self, CorpGraphError> {
        match value.map(str::trim) {
            None | Some("") => Err(CorpGraphError::MissingQueryType {
                available: Self::available(),
            }),
            Some(v) => v.parse(),
        }
    }

    pub fn definition(self) -> QueryDefinition {
        definition(self)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = CorpGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| CorpGraphError::UnknownQueryType {
                provided: s.to_string(),
                available: Self::available(),
            })
    }
}

/// Entity a query ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Company,
    Director,
}

impl Subject {
    pub fn matches(self, kind: &NodeKind) -> bool {
        matches!(
            (self, kind),
            (Subject::Company, NodeKind::Company) | (Subject::Director, NodeKind::Director)
        )
    }
}

/// How candidate rows are grouped before picking a representative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// Incorporation records sharing a company name are one logical company.
    CompanyName,
    CompanyIdentity,
    DirectorIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// How a ranking property is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKind {
    Numeric,
    Text,
}

/// Ranking criterion for representative selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranking {
    pub property: &'static str,
    pub order: SortOrder,
    pub kind: RankKind,
}

/// Shape of the digest attached to a query response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightStyle {
    None,
    /// Top directors by the enriched metric.
    TopDirectors,
    /// Companies with raw and crore-formatted capital under `label`.
    Capital { label: &'static str },
    /// Companies with incorporation date.
    IncorporationDate,
    /// Companies with director count and director names.
    DirectorCount,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct QueryDefinition {
    pub query_type: QueryType,
    pub description: &'static str,
    pub cypher: &'static str,
    pub subject: Subject,
    pub group_key: GroupKey,
    pub ranking: Option<Ranking>,
    pub highlight: HighlightStyle,
}

impl QueryDefinition {
    pub fn enrichment(&self) -> Option<&'static Enrichment> {
        enrichment_for(self.query_type)
    }

    /// Name of the aggregate column the query returns, if any.
    pub fn aggregate_column(&self) -> Option<&'static str> {
        self.enrichment().map(|e| e.column)
    }
}

fn definition(query_type: QueryType) -> QueryDefinition {
    match query_type {
        QueryType::TopPaidDefence => QueryDefinition {
            query_type,
            description: "Top 10 defence companies by paid capital",
            cypher: "MATCH (c:Company)
                     WHERE toLower(c.activity) CONTAINS 'defence'
                       AND c.paid_capital IS NOT NULL
                       AND toFloat(c.paid_capital) > 0
                     WITH c.name AS company_name,
                          max(toFloat(c.paid_capital)) AS max_paid_capital,
                          collect(c) AS company_nodes
                     ORDER BY max_paid_capital DESC
                     LIMIT 10
                     UNWIND company_nodes AS c
                     OPTIONAL MATCH (c)<-[r:DIRECTED]-(d:Director)
                     RETURN c, d, r, max_paid_capital
                     ORDER BY max_paid_capital DESC, company_name, id(c)",
            subject: Subject::Company,
            group_key: GroupKey::CompanyName,
            ranking: Some(Ranking {
                property: "paid_capital",
                order: SortOrder::Descending,
                kind: RankKind::Numeric,
            }),
            highlight: HighlightStyle::Capital { label: "paid_capital" },
        },
        QueryType::OldestTrading => QueryDefinition {
            query_type,
            description: "Top 10 oldest trading companies",
            cypher: "MATCH (c:Company)
                     WHERE toLower(c.activity) CONTAINS 'trading'
                       AND c.inc_date IS NOT NULL
                     WITH c.name AS company_name,
                          min(c.inc_date) AS earliest_date,
                          collect(c) AS company_nodes
                     ORDER BY earliest_date ASC
                     LIMIT 10
                     UNWIND company_nodes AS c
                     OPTIONAL MATCH (c)<-[r:DIRECTED]-(d:Director)
                     RETURN c, d, r, earliest_date
                     ORDER BY earliest_date ASC, company_name, id(c)",
            subject: Subject::Company,
            group_key: GroupKey::CompanyName,
            ranking: Some(Ranking {
                property: "inc_date",
                order: SortOrder::Ascending,
                kind: RankKind::Text,
            }),
            highlight: HighlightStyle::IncorporationDate,
        },
        QueryType::MostConnectedDirectors => QueryDefinition {
            query_type,
            description: "Top 5 most connected directors",
            cypher: "MATCH (d:Director)-[:DIRECTED]->(c:Company)
                     WHERE d.din IS NOT NULL AND trim(toString(d.din)) <> ''
                     WITH d,
                          count(DISTINCT c.name) AS unique_company_count,
                          collect(DISTINCT c)[0..10] AS connected_companies
                     ORDER BY unique_company_count DESC, d.name
                     LIMIT 5
                     UNWIND connected_companies AS c
                     OPTIONAL MATCH (d)-[r:DIRECTED]->(c)
                     RETURN d, c, r, unique_company_count
                     ORDER BY unique_company_count DESC, d.name, id(c)",
            subject: Subject::Director,
            group_key: GroupKey::DirectorIdentity,
            ranking: None,
            highlight: HighlightStyle::TopDirectors,
        },
        QueryType::BusinessCompanies => QueryDefinition {
            query_type,
            description: "Top 10 business companies by paid capital",
            cypher: "MATCH (c:Company)
                     WHERE toLower(c.activity) CONTAINS 'business'
                       AND c.paid_capital IS NOT NULL
                     WITH c.name AS company_name,
                          max(toFloat(c.paid_capital)) AS max_paid_capital,
                          collect(c) AS company_nodes
                     ORDER BY max_paid_capital DESC
                     LIMIT 10
                     UNWIND company_nodes AS c
                     OPTIONAL MATCH (c)<-[r:DIRECTED]-(d:Director)
                     RETURN c, d, r, max_paid_capital
                     ORDER BY max_paid_capital DESC, company_name, id(c)",
            subject: Subject::Company,
            group_key: GroupKey::CompanyName,
            ranking: Some(Ranking {
                property: "paid_capital",
                order: SortOrder::Descending,
                kind: RankKind::Numeric,
            }),
            highlight: HighlightStyle::Capital { label: "paid_capital" },
        },
        QueryType::NonGovDefence => QueryDefinition {
            query_type,
            description: "Non-government defence companies",
            cypher: "MATCH (c:Company)
                     WHERE toLower(c.sub_category) CONTAINS 'non'
                       AND (toLower(c.activity) CONTAINS 'defence'
                            OR ANY(info IN c.primary_info WHERE toLower(info) CONTAINS 'defence'))
                     WITH c.name AS company_name, collect(c) AS company_nodes
                     ORDER BY company_name
                     LIMIT 10
                     UNWIND company_nodes AS c
                     OPTIONAL MATCH (c)<-[r:DIRECTED]-(d:Director)
                     RETURN c, d, r
                     ORDER BY company_name, id(c)",
            subject: Subject::Company,
            group_key: GroupKey::CompanyName,
            ranking: None,
            highlight: HighlightStyle::None,
        },
        QueryType::DefenceByDirectors => QueryDefinition {
            query_type,
            description: "Defence companies by director count",
            cypher: "MATCH (c:Company)<-[:DIRECTED]-(d:Director)
                     WHERE toLower(c.activity) CONTAINS 'defence'
                        OR ANY(info IN c.primary_info WHERE toLower(info) CONTAINS 'defence')
                     WITH c, count(DISTINCT d) AS director_count
                     ORDER BY director_count DESC
                     LIMIT 10
                     MATCH (c)<-[r:DIRECTED]-(d:Director)
                     RETURN c, d, r, director_count
                     ORDER BY director_count DESC, id(c), id(d)",
            subject: Subject::Company,
            group_key: GroupKey::CompanyIdentity,
            ranking: None,
            highlight: HighlightStyle::DirectorCount,
        },
        QueryType::UnionGovDefence => QueryDefinition {
            query_type,
            description: "Union government defence companies by capital",
            cypher: "MATCH (c:Company)
                     WHERE toLower(c.sub_category) CONTAINS 'union government company'
                       AND (toLower(c.activity) CONTAINS 'defence'
                            OR ANY(info IN c.primary_info WHERE toLower(info) CONTAINS 'defence'))
                       AND c.auth_capital IS NOT NULL
                     WITH c.name AS company_name,
                          max(toFloat(c.auth_capital)) AS max_auth_capital,
                          collect(c) AS company_nodes
                     ORDER BY max_auth_capital DESC
                     LIMIT 10
                     UNWIND company_nodes AS c
                     OPTIONAL MATCH (c)<-[r:DIRECTED]-(d:Director)
                     RETURN c, d, r, max_auth_capital
                     ORDER BY max_auth_capital DESC, company_name, id(c)",
            subject: Subject::Company,
            group_key: GroupKey::CompanyName,
            ranking: Some(Ranking {
                property: "auth_capital",
                order: SortOrder::Descending,
                kind: RankKind::Numeric,
            }),
            highlight: HighlightStyle::Capital { label: "authorized_capital" },
        },
        QueryType::ElectronicsCompanies => QueryDefinition {
            query_type,
            description: "Electronics companies",
            cypher: "MATCH (c:Company)
                     WHERE toLower(c.activity) CONTAINS 'electronics'
                        OR ANY(info IN c.primary_info WHERE toLower(info) CONTAINS 'electronics')
                     WITH c.name AS company_name, collect(c) AS company_nodes
                     ORDER BY company_name
                     LIMIT 100
                     UNWIND company_nodes AS c
                     OPTIONAL MATCH (c)<-[r:DIRECTED]-(d:Director)
                     RETURN c, d, r
                     ORDER BY company_name, id(c)",
            subject: Subject::Company,
            group_key: GroupKey::CompanyName,
            ranking: None,
            highlight: HighlightStyle::None,
        },
        QueryType::RecentDefence => QueryDefinition {
            query_type,
            description: "Most recently incorporated defence companies",
            cypher: "MATCH (c:Company)
                     WHERE (toLower(c.activity) CONTAINS 'defence'
                            OR ANY(info IN c.primary_info WHERE toLower(info) CONTAINS 'defence'))
                       AND c.inc_date IS NOT NULL
                     WITH c.name AS company_name,
                          max(c.inc_date) AS latest_inc_date,
                          collect(c) AS company_nodes
                     ORDER BY latest_inc_date DESC
                     LIMIT 10
                     UNWIND company_nodes AS c
                     OPTIONAL MATCH (c)<-[r:DIRECTED]-(d:Director)
                     RETURN c, d, r, latest_inc_date
                     ORDER BY latest_inc_date DESC, company_name, id(c)",
            subject: Subject::Company,
            group_key: GroupKey::CompanyName,
            ranking: Some(Ranking {
                property: "inc_date",
                order: SortOrder::Descending,
                kind: RankKind::Text,
            }),
            highlight: HighlightStyle::IncorporationDate,
        },
        QueryType::DirectorsByCapital => QueryDefinition {
            query_type,
            description: "Directors by total authorized capital",
            cypher: "MATCH (d:Director)-[:DIRECTED]->(c:Company)
                     WHERE c.auth_capital IS NOT NULL
                     WITH d, sum(toFloat(c.auth_capital)) AS total_authorized_capital
                     ORDER BY total_authorized_capital DESC
                     LIMIT 10
                     MATCH (d)-[r:DIRECTED]->(c:Company)
                     RETURN d, c, r, total_authorized_capital
                     ORDER BY total_authorized_capital DESC, id(d), id(c)",
            subject: Subject::Director,
            group_key: GroupKey::DirectorIdentity,
            ranking: None,
            highlight: HighlightStyle::TopDirectors,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for query in QueryType::ALL {
            assert_eq!(query.as_str().parse::<QueryType>().unwrap(), query);
            assert_eq!(query.definition().query_type, query);
        }
        assert_eq!(QueryType::available().len(), 10);
    }

    #[test]
    fn test_unknown_type_lists_enumeration() {
        match "not-a-real-query".parse::<QueryType>() {
            Err(CorpGraphError::UnknownQueryType { provided, available }) => {
                assert_eq!(provided, "not-a-real-query");
                assert_eq!(available, QueryType::available());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_type() {
        assert!(matches!(
            QueryType::parse_param(None),
            Err(CorpGraphError::MissingQueryType { .. })
        ));
        assert!(matches!(
            QueryType::parse_param(Some("  ")),
            Err(CorpGraphError::MissingQueryType { .. })
        ));
        assert_eq!(
            QueryType::parse_param(Some("oldest-trading")).unwrap(),
            QueryType::OldestTrading
        );
    }

    #[test]
    fn test_cypher_returns_declared_aggregate() {
        for query in QueryType::ALL {
            let def = query.definition();
            assert!(def.cypher.contains("RETURN"), "{query} has no RETURN");
            if let Some(column) = def.aggregate_column() {
                assert!(def.cypher.contains(column), "{query} does not return {column}");
            }
        }
    }

    #[test]
    fn test_most_connected_excludes_blank_din() {
        let def = QueryType::MostConnectedDirectors.definition();
        assert!(def.cypher.contains("d.din IS NOT NULL"));
        assert_eq!(def.subject, Subject::Director);
    }
}
