//! Representative selection for grouped analytical queries.
//!
//! Several incorporation records can share one company name. Group queries
//! return every candidate of a group; exactly one of them becomes the node
//! shown for the group. The choice is the candidate with the extremal
//! ranking value, ties going to the first one seen, so identical input always
//! yields the same representative.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::catalog::{GroupKey, QueryDefinition, RankKind, Ranking, SortOrder, Subject};
use crate::model::{AnalyticRow, EntityNode};

/// A comparable ranking value.
#[derive(Debug, Clone, PartialEq)]
pub enum RankValue {
    Number(f64),
    Text(String),
}

impl RankValue {
    pub fn parse(value: &Value, kind: RankKind) -> Option<Self> {
        match kind {
            RankKind::Numeric => numeric(value).map(Self::Number),
            RankKind::Text => match value {
                Value::String(s) if !s.trim().is_empty() => Some(Self::Text(s.trim().to_string())),
                Value::Number(n) => Some(Self::Text(n.to_string())),
                _ => None,
            },
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }

    /// True when `self` strictly beats `other` under `order`.
    pub fn beats(&self, other: &Self, order: SortOrder) -> bool {
        match order {
            SortOrder::Descending => self.compare(other) == Ordering::Greater,
            SortOrder::Ascending => self.compare(other) == Ordering::Less,
        }
    }
}

/// Numeric view of a JSON value; numeric strings such as `"1,00,000"` are
/// accepted.
pub fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// The row's entity that the query ranks.
pub fn subject_of(row: &AnalyticRow, subject: Subject) -> Option<&EntityNode> {
    match subject {
        Subject::Company => row.company.as_ref(),
        Subject::Director => row.director.as_ref(),
    }
}

/// Grouping key of a subject entity.
pub fn group_key(entity: &EntityNode, key: GroupKey) -> String {
    match key {
        // Nameless companies never merge with each other.
        GroupKey::CompanyName => match entity.name() {
            Some(name) => format!("name:{}", name),
            None => format!("id:{}", entity.id),
        },
        GroupKey::CompanyIdentity | GroupKey::DirectorIdentity => format!("id:{}", entity.id),
    }
}

/// One group after selection.
#[derive(Debug, Clone)]
pub struct Group<'r> {
    pub key: String,
    pub representative: &'r EntityNode,
    /// Rows whose subject is the representative, in input order.
    pub rows: Vec<&'r AnalyticRow>,
    /// The group's aggregate: the extremal one under the ranking, else the
    /// first non-null.
    pub aggregate: Option<&'r Value>,
}

struct Candidate<'r> {
    entity: &'r EntityNode,
    aggregate_rank: Option<RankValue>,
}

struct GroupBuild<'r> {
    key: String,
    candidates: Vec<Candidate<'r>>,
    candidate_index: HashMap<i64, usize>,
    rows: Vec<&'r AnalyticRow>,
}

/// Group rows by the query's key and pick one representative per group.
///
/// Groups are returned in first-seen order. Rows without a subject entity
/// cannot be grouped and are left out; [`ungrouped_rows`] yields them.
pub fn select_representatives<'r>(rows: &'r [AnalyticRow], def: &QueryDefinition) -> Vec<Group<'r>> {
    let mut builds: Vec<GroupBuild<'r>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(entity) = subject_of(row, def.subject) else {
            debug!(query_type = %def.query_type, "Row without subject entity left ungrouped");
            continue;
        };

        let key = group_key(entity, def.group_key);
        let pos = *index.entry(key.clone()).or_insert_with(|| {
            builds.push(GroupBuild {
                key,
                candidates: Vec::new(),
                candidate_index: HashMap::new(),
                rows: Vec::new(),
            });
            builds.len() - 1
        });
        let build = &mut builds[pos];

        let cpos = *build.candidate_index.entry(entity.id).or_insert_with(|| {
            build.candidates.push(Candidate {
                entity,
                aggregate_rank: None,
            });
            build.candidates.len() - 1
        });

        if let (Some(ranking), Some(agg)) = (def.ranking, row.aggregate.as_ref()) {
            if let Some(rank) = RankValue::parse(agg, ranking.kind) {
                let candidate = &mut build.candidates[cpos];
                let replace = candidate
                    .aggregate_rank
                    .as_ref()
                    .map_or(true, |current| rank.beats(current, ranking.order));
                if replace {
                    candidate.aggregate_rank = Some(rank);
                }
            }
        }

        build.rows.push(row);
    }

    builds
        .into_iter()
        .map(|build| {
            let representative = pick(&build.candidates, def.ranking);
            let aggregate = group_aggregate(&build.rows, def.ranking);
            let rows = build
                .rows
                .into_iter()
                .filter(|row| subject_of(row, def.subject).is_some_and(|e| e.id == representative.id))
                .collect();
            Group {
                key: build.key,
                representative,
                rows,
                aggregate,
            }
        })
        .collect()
}

/// Rows that carry no subject entity, in input order.
pub fn ungrouped_rows<'r>(
    rows: &'r [AnalyticRow],
    def: &QueryDefinition,
) -> impl Iterator<Item = &'r AnalyticRow> + 'r {
    let subject = def.subject;
    rows.iter().filter(move |row| subject_of(row, subject).is_none())
}

/// Effective rank of a candidate: its own ranking property, else the best
/// aggregate seen on its rows.
fn candidate_rank(candidate: &Candidate<'_>, ranking: &Ranking) -> Option<RankValue> {
    candidate
        .entity
        .properties
        .get(ranking.property)
        .and_then(|v| RankValue::parse(v, ranking.kind))
        .or_else(|| candidate.aggregate_rank.clone())
}

fn pick<'r>(candidates: &[Candidate<'r>], ranking: Option<Ranking>) -> &'r EntityNode {
    let first = candidates[0].entity;
    let Some(ranking) = ranking else {
        return first;
    };

    let mut best: Option<(&'r EntityNode, RankValue)> = None;
    for candidate in candidates {
        let Some(rank) = candidate_rank(candidate, &ranking) else {
            continue;
        };
        let replace = best
            .as_ref()
            .map_or(true, |(_, current)| rank.beats(current, ranking.order));
        if replace {
            best = Some((candidate.entity, rank));
        }
    }
    best.map_or(first, |(entity, _)| entity)
}

fn group_aggregate<'r>(rows: &[&'r AnalyticRow], ranking: Option<Ranking>) -> Option<&'r Value> {
    let mut values = rows
        .iter()
        .filter_map(|row| row.aggregate.as_ref())
        .filter(|v| !v.is_null());

    let Some(ranking) = ranking else {
        return values.next();
    };

    let mut best: Option<(&'r Value, Option<RankValue>)> = None;
    for value in values {
        let rank = RankValue::parse(value, ranking.kind);
        let replace = match (&best, &rank) {
            (None, _) => true,
            (Some((_, None)), Some(_)) => true,
            (Some((_, Some(current))), Some(rank)) => rank.beats(current, ranking.order),
            _ => false,
        };
        if replace {
            best = Some((value, rank));
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QueryType;
    use serde_json::json;

    fn company(id: i64, name: &str, paid: Value) -> EntityNode {
        EntityNode::new(id, &["Company"])
            .with_property("name", name)
            .with_property("paid_capital", paid)
    }

    fn row(company: EntityNode, aggregate: Option<Value>) -> AnalyticRow {
        AnalyticRow {
            company: Some(company),
            aggregate,
            ..Default::default()
        }
    }

    #[test]
    fn test_extremal_candidate_wins() {
        let rows = vec![
            row(company(1, "Acme", json!("100")), Some(json!(500.0))),
            row(company(2, "Acme", json!("500")), Some(json!(500.0))),
        ];
        let def = QueryType::TopPaidDefence.definition();
        let groups = select_representatives(&rows, &def);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].representative.id, 2);
        assert_eq!(groups[0].rows.len(), 1);
        assert_eq!(groups[0].aggregate, Some(&json!(500.0)));
    }

    #[test]
    fn test_ascending_ranking() {
        let def = QueryType::OldestTrading.definition();
        let rows = vec![
            row(
                EntityNode::new(1, &["Company"]).with_property("name", "Old").with_property("inc_date", "2001-01-01"),
                None,
            ),
            row(
                EntityNode::new(2, &["Company"]).with_property("name", "Old").with_property("inc_date", "1990-05-01"),
                None,
            ),
        ];
        let groups = select_representatives(&rows, &def);
        assert_eq!(groups[0].representative.id, 2);
    }

    #[test]
    fn test_tie_goes_to_first_seen_every_time() {
        let rows = vec![
            row(company(7, "Acme", json!(300)), None),
            row(company(3, "Acme", json!(300)), None),
            row(company(5, "Acme", json!(100)), None),
        ];
        let def = QueryType::TopPaidDefence.definition();
        for _ in 0..5 {
            let groups = select_representatives(&rows, &def);
            assert_eq!(groups[0].representative.id, 7);
        }
    }

    #[test]
    fn test_unrankable_candidates_lose_to_ranked() {
        let rows = vec![
            row(company(1, "Acme", Value::Null), None),
            row(company(2, "Acme", json!("n/a")), None),
            row(company(3, "Acme", json!(10)), None),
        ];
        let def = QueryType::BusinessCompanies.definition();
        let groups = select_representatives(&rows, &def);
        assert_eq!(groups[0].representative.id, 3);
    }

    #[test]
    fn test_aggregate_ranks_candidates_without_property() {
        let rows = vec![
            row(EntityNode::new(1, &["Company"]).with_property("name", "Acme"), Some(json!(100))),
            row(EntityNode::new(2, &["Company"]).with_property("name", "Acme"), Some(json!(500))),
        ];
        let def = QueryType::TopPaidDefence.definition();
        let groups = select_representatives(&rows, &def);
        assert_eq!(groups[0].representative.id, 2);
        assert_eq!(groups[0].aggregate, Some(&json!(500)));
    }

    #[test]
    fn test_unranked_query_keeps_first_and_its_fan_out() {
        let director = EntityNode::new(10, &["Director"]).with_property("name", "Jane");
        let rows = vec![
            AnalyticRow {
                company: Some(company(1, "Volt", Value::Null)),
                director: Some(director.clone()),
                ..Default::default()
            },
            row(company(2, "Volt", Value::Null), None),
            AnalyticRow {
                company: Some(company(1, "Volt", Value::Null)),
                director: Some(EntityNode::new(11, &["Director"])),
                ..Default::default()
            },
        ];
        let def = QueryType::ElectronicsCompanies.definition();
        let groups = select_representatives(&rows, &def);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].representative.id, 1);
        assert_eq!(groups[0].rows.len(), 2);
    }

    #[test]
    fn test_groups_keep_first_seen_order_and_skip_subjectless_rows() {
        let rows = vec![
            row(company(1, "Beta", json!(1)), None),
            AnalyticRow::default(),
            row(company(2, "Alpha", json!(1)), None),
            row(company(3, "Beta", json!(2)), None),
        ];
        let def = QueryType::TopPaidDefence.definition();
        let groups = select_representatives(&rows, &def);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["name:Beta", "name:Alpha"]);
    }

    #[test]
    fn test_director_groups_by_identity() {
        let jane = EntityNode::new(10, &["Director"]).with_property("name", "Jane");
        let rows = vec![
            AnalyticRow {
                director: Some(jane.clone()),
                company: Some(company(1, "A", Value::Null)),
                aggregate: Some(json!(2)),
                ..Default::default()
            },
            AnalyticRow {
                director: Some(jane),
                company: Some(company(2, "B", Value::Null)),
                aggregate: Some(json!(2)),
                ..Default::default()
            },
        ];
        let def = QueryType::MostConnectedDirectors.definition();
        let groups = select_representatives(&rows, &def);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[0].aggregate, Some(&json!(2)));
    }

    #[test]
    fn test_numeric_parsing() {
        assert_eq!(numeric(&json!("1,00,000")), Some(100000.0));
        assert_eq!(numeric(&json!(" 42.5 ")), Some(42.5));
        assert_eq!(numeric(&json!(true)), None);
        assert_eq!(numeric(&json!("NaN")), None);
    }
}
