//! Result normalization: row shapes in, canonical `{nodes, links}` out.
//!
//! Every entry point creates a fresh [`GraphAccumulator`], feeds it the rows
//! of one query and finalizes it. Nothing is shared between calls.

use serde_json::Value;
use tracing::debug;

use crate::accumulator::{GraphAccumulator, DIRECTED};
use crate::catalog::QueryType;
use crate::enrichment;
use crate::model::{
    AnalyticRow, CollectedCompany, CollectedDirector, CompanyProfileRow, DirectorProfileRow,
    EntityNode, GraphView, NodeKind, Properties, TripleRow,
};
use crate::reference::ReferenceSet;
use crate::representative::{select_representatives, ungrouped_rows};

/// Normalize `MATCH (n)-[r]->(m) RETURN n, r, m` rows.
pub fn normalize_full_graph(rows: &[TripleRow], primary: Option<&ReferenceSet>) -> GraphView {
    let mut acc = GraphAccumulator::new();

    for row in rows {
        let source = acc.add_entity(&row.source);
        let target = acc.add_entity(&row.target);
        let rel = &row.relationship;

        let endpoints = if rel.start_id == row.source.id && rel.end_id == row.target.id {
            Some((source, target))
        } else if rel.start_id == row.target.id && rel.end_id == row.source.id {
            Some((target, source))
        } else {
            None
        };

        match endpoints {
            Some((from, to)) => {
                acc.add_edge(&from, &to, &rel.rel_type, &rel.properties);
            }
            None => {
                debug!(
                    relationship = rel.id,
                    start = rel.start_id,
                    end = rel.end_id,
                    "Skipping relationship whose endpoints do not match the row"
                );
                acc.note_skipped_edge();
            }
        }
    }

    finish(acc, primary, "full_graph")
}

/// Normalize a company with its collected directors.
pub fn normalize_company_profile(row: &CompanyProfileRow) -> GraphView {
    let mut acc = GraphAccumulator::new();
    let company = acc.add_entity(&row.company);

    for director in row.named_directors() {
        match collected_director_id(director) {
            Some(id) => {
                let id = acc.add_node(id, NodeKind::Director, &collected_director_properties(director));
                acc.add_edge(&id, &company, DIRECTED, &designation(director.designation.as_deref()));
            }
            None => {
                debug!(company = %company, "Skipping collected director without identity");
                acc.note_skipped_edge();
            }
        }
    }

    finish(acc, None, "company_profile")
}

/// Normalize a director with its collected companies.
pub fn normalize_director_profile(row: &DirectorProfileRow) -> GraphView {
    let mut acc = GraphAccumulator::new();
    let director = acc.add_entity(&row.director);

    for company in row.named_companies() {
        match collected_company_id(company) {
            Some(id) => {
                let id = acc.add_node(id, NodeKind::Company, &collected_company_properties(company));
                acc.add_edge(&director, &id, DIRECTED, &designation(company.designation.as_deref()));
            }
            None => {
                debug!(director = %director, "Skipping collected company without identity");
                acc.note_skipped_edge();
            }
        }
    }

    finish(acc, None, "director_profile")
}

/// Normalize a bare list of company entities.
pub fn normalize_companies(companies: &[EntityNode], primary: Option<&ReferenceSet>) -> GraphView {
    let mut acc = GraphAccumulator::new();
    for company in companies {
        acc.add_entity(company);
    }
    finish(acc, primary, "companies")
}

/// Normalize the rows of an analytical catalog query.
///
/// Rows are grouped by the query's key, one representative is kept per
/// group, its rows are applied and the group aggregate is written onto it.
/// Rows without the subject entity still contribute their other node.
/// Analytical views are classified without a primary identifier set.
pub fn normalize_analytic(query_type: QueryType, rows: &[AnalyticRow]) -> GraphView {
    let def = query_type.definition();
    let rule = def.enrichment();
    let mut acc = GraphAccumulator::new();

    for group in select_representatives(rows, &def) {
        for row in &group.rows {
            apply_analytic_row(&mut acc, row);
        }
        if let Some(rule) = rule {
            enrichment::apply(&mut acc, rule, &group.representative.view_id(), group.aggregate);
        }
    }
    for row in ungrouped_rows(rows, &def) {
        apply_analytic_row(&mut acc, row);
    }

    debug!(query_type = %query_type, rows = rows.len(), "Normalized analytical rows");
    finish(acc, None, query_type.as_str())
}

fn apply_analytic_row(acc: &mut GraphAccumulator, row: &AnalyticRow) {
    let company = row.company.as_ref().map(|c| (c.id, acc.add_entity(c)));
    let director = row.director.as_ref().map(|d| (d.id, acc.add_entity(d)));

    let Some(rel) = row.relationship.as_ref() else {
        return;
    };
    match (company, director) {
        (Some((company_id, company)), Some((director_id, director)))
            if bound_to(rel.start_id, rel.end_id, company_id, director_id) =>
        {
            acc.add_edge(&director, &company, &rel.rel_type, &rel.properties);
        }
        _ => {
            debug!(relationship = rel.id, "Skipping relationship without both row endpoints");
            acc.note_skipped_edge();
        }
    }
}

fn bound_to(start: i64, end: i64, a: i64, b: i64) -> bool {
    (start == a && end == b) || (start == b && end == a)
}

fn finish(acc: GraphAccumulator, primary: Option<&ReferenceSet>, view: &str) -> GraphView {
    let skipped = acc.skipped_edges();
    let result = acc.finalize(primary);
    debug!(
        view,
        nodes = result.nodes.len(),
        links = result.links.len(),
        skipped_edges = skipped,
        "Normalized graph view"
    );
    result
}

fn collected_director_id(director: &CollectedDirector) -> Option<String> {
    director
        .director_id
        .map(|id| id.to_string())
        .or_else(|| non_blank(director.din.as_deref()).map(|din| format!("din:{}", din)))
}

fn collected_company_id(company: &CollectedCompany) -> Option<String> {
    company
        .company_id
        .map(|id| id.to_string())
        .or_else(|| non_blank(company.cin.as_deref()).map(|cin| format!("cin:{}", cin)))
}

fn collected_director_properties(director: &CollectedDirector) -> Properties {
    let mut props = Properties::new();
    insert_opt(&mut props, "name", director.name.as_deref());
    insert_opt(&mut props, "din", director.din.as_deref());
    props
}

fn collected_company_properties(company: &CollectedCompany) -> Properties {
    let mut props = Properties::new();
    insert_opt(&mut props, "name", company.name.as_deref());
    insert_opt(&mut props, "cin", company.cin.as_deref());
    props
}

fn designation(value: Option<&str>) -> Properties {
    let mut props = Properties::new();
    insert_opt(&mut props, "designation", value);
    props
}

fn insert_opt(props: &mut Properties, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        props.insert(key.to_string(), Value::String(v.to_string()));
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
