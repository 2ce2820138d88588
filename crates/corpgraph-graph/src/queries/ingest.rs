//! Company/director upserts.

use anyhow::Result;
use neo4rs::Query;
use tracing::info;

use corpgraph_core::ingest::{parse_date, present};
use corpgraph_core::CompanyDirectorSubmission;

use crate::GraphClient;

const UPSERT_COMPANY: &str = "MERGE (c:Company {cin: $cin})
     SET c += {
         name: $name,
         state: $state,
         paid_capital: $paid_capital,
         inc_date: $inc_date,
         address: $address,
         category: $category,
         sub_category: $sub_category,
         activity: $activity
     }";

const UPSERT_DIRECTOR: &str = "MERGE (d:Director {din: $din})
     SET d.name = $name";

const UPSERT_OTHER_COMPANY: &str = "MERGE (oc:Company {cin: $cin})
     SET oc.name = $name";

const LINK_DIRECTOR: &str = "MATCH (d:Director {din: $din}), (c:Company {cin: $cin})
     MERGE (d)-[r:DIRECTED]->(c)
     SET r.designation = $designation,
         r.appointment_date = $appointment_date";

fn opt(value: &Option<String>) -> Option<String> {
    present(value.as_deref()).map(str::to_string)
}

/// Statements for one submission, in execution order.
///
/// The submission must already be validated.
pub fn upsert_statements(submission: &CompanyDirectorSubmission) -> Vec<Query> {
    let company = &submission.company;
    let director = &submission.director;
    let din = director.din.trim();

    let mut statements = vec![
        Query::new(UPSERT_COMPANY.to_string())
            .param("cin", company.cin.trim())
            .param("name", company.name.trim())
            .param("state", opt(&company.state))
            .param("paid_capital", company.paid_capital_amount())
            .param("inc_date", parse_date(company.inc_date.as_deref()))
            .param("address", opt(&company.address))
            .param("category", opt(&company.category))
            .param("sub_category", opt(&company.sub_category))
            .param("activity", opt(&company.activity)),
        Query::new(UPSERT_DIRECTOR.to_string())
            .param("din", din)
            .param("name", director.name.trim()),
        Query::new(LINK_DIRECTOR.to_string())
            .param("din", din)
            .param("cin", company.cin.trim())
            .param("designation", director.designation.trim())
            .param("appointment_date", parse_date(director.appointment_date.as_deref())),
    ];

    for other in &submission.other_companies {
        statements.push(
            Query::new(UPSERT_OTHER_COMPANY.to_string())
                .param("cin", other.cin.trim())
                .param("name", other.name.trim()),
        );
        statements.push(
            Query::new(LINK_DIRECTOR.to_string())
                .param("din", din)
                .param("cin", other.cin.trim())
                .param("designation", submission.designation_for(other).trim())
                .param("appointment_date", parse_date(other.appointment_date.as_deref())),
        );
    }

    statements
}

/// Upsert the company, the director, their directorship and any other
/// companies in a single transaction.
pub async fn upsert_company_director(
    client: &GraphClient,
    submission: &CompanyDirectorSubmission,
) -> Result<()> {
    client.run_in_transaction(upsert_statements(submission)).await?;
    info!(
        cin = %submission.company.cin,
        din = %submission.director.din,
        other_companies = submission.other_companies.len(),
        "Stored company/director submission"
    );
    Ok(())
}
