//! Entity lookups: the full graph, company and director profiles, company
//! listings.

use anyhow::Result;
use neo4rs::Query;

use corpgraph_core::{CompanyProfileRow, DirectorProfileRow, EntityNode, TripleRow};

use crate::decode;
use crate::GraphClient;

/// Every relationship with its endpoints, up to `limit` rows.
pub async fn full_graph(client: &GraphClient, limit: usize) -> Result<Vec<TripleRow>> {
    let query = Query::new(
        "MATCH (n)-[r]->(m)
         RETURN n, r, m
         LIMIT $limit"
            .to_string(),
    )
    .param("limit", limit as i64);

    client.query(query).await?.iter().map(decode::triple_row).collect()
}

/// A company and its directors, or `None` when no company has this CIN.
pub async fn company_profile(client: &GraphClient, cin: &str) -> Result<Option<CompanyProfileRow>> {
    let query = Query::new(
        "MATCH (c:Company {cin: $cin})
         OPTIONAL MATCH (d:Director)-[r:DIRECTED]->(c)
         RETURN c, collect({
             name: d.name,
             din: toString(d.din),
             designation: r.designation,
             director_id: id(d)
         }) AS directors"
            .to_string(),
    )
    .param("cin", cin);

    client
        .query(query)
        .await?
        .first()
        .map(decode::company_profile_row)
        .transpose()
}

/// A director and its companies, or `None` when no director has this DIN.
pub async fn director_profile(client: &GraphClient, din: &str) -> Result<Option<DirectorProfileRow>> {
    let query = Query::new(
        "MATCH (d:Director {din: $din})
         OPTIONAL MATCH (d)-[r:DIRECTED]->(c:Company)
         RETURN d, collect({
             name: c.name,
             cin: toString(c.cin),
             designation: r.designation,
             company_id: id(c)
         }) AS companies"
            .to_string(),
    )
    .param("din", din);

    client
        .query(query)
        .await?
        .first()
        .map(decode::director_profile_row)
        .transpose()
}

/// Company nodes, optionally capped.
pub async fn companies(client: &GraphClient, limit: Option<usize>) -> Result<Vec<EntityNode>> {
    let query = match limit {
        Some(limit) => Query::new("MATCH (c:Company) RETURN c LIMIT $limit".to_string())
            .param("limit", limit as i64),
        None => Query::new("MATCH (c:Company) RETURN c".to_string()),
    };

    client.query(query).await?.iter().map(decode::company_row).collect()
}
