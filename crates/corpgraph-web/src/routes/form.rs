//! Company/director ingestion form.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use corpgraph_core::CompanyDirectorSubmission;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: CompanyDirectorSubmission,
}

pub async fn submit_company_director(
    State(state): State<AppState>,
    payload: Result<Json<CompanyDirectorSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let Json(submission) = payload?;
    submission.validate()?;
    state.store.upsert_company_director(&submission).await?;

    info!(cin = %submission.company.cin, din = %submission.director.din, "Accepted form submission");

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            success: true,
            message: "Company and director information successfully added",
            data: submission,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::testing::{post_json, router, send, FakeStore};

    #[tokio::test]
    async fn test_valid_submission_is_stored() {
        let store = Arc::new(FakeStore::default());
        let app = router(store.clone(), Path::new("absent.json"));
        let payload = json!({
            "company": {"cin": "U1", "name": "Acme", "inc_date": "2001-04-12"},
            "director": {"din": "D1", "name": "Jane", "designation": "MD"},
            "otherCompanies": [{"cin": "U2", "name": "Beta"}]
        });
        let (status, body) = send(app, post_json("/api/form/company-director", &payload)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["otherCompanies"][0]["cin"], "U2");

        let stored = store.submissions.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].director.din, "D1");
    }

    #[tokio::test]
    async fn test_invalid_submission_lists_errors_and_skips_store() {
        let store = Arc::new(FakeStore::default());
        let app = router(store.clone(), Path::new("absent.json"));
        let payload = json!({
            "company": {"cin": "U1"},
            "director": {"din": "D1", "name": "Jane"}
        });
        let (status, body) = send(app, post_json("/api/form/company-director", &payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["category"], "validation");
        assert_eq!(body["details"], json!(["Company name is required", "Designation is required"]));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_gets_error_body() {
        let store = Arc::new(FakeStore::default());
        let app = router(store.clone(), Path::new("absent.json"));
        let (status, body) = send(app, post_json("/api/form/company-director", &json!({"company": 7}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["category"], "validation");
        assert_eq!(store.calls(), 0);
    }
}
