//! Company/director submissions accepted by the ingestion endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CorpGraphError, CorpGraphResult};
use crate::representative::numeric;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanySubmission {
    pub cin: String,
    pub name: String,
    pub state: Option<String>,
    pub paid_capital: Option<Value>,
    pub inc_date: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub activity: Option<String>,
}

impl CompanySubmission {
    /// Paid capital as a number; blank values are absent.
    pub fn paid_capital_amount(&self) -> Option<f64> {
        self.paid_capital.as_ref().and_then(numeric)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorSubmission {
    pub din: String,
    pub name: String,
    pub designation: String,
    pub appointment_date: Option<String>,
}

/// Another company the same director sits on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherCompany {
    pub cin: String,
    pub name: String,
    pub designation: Option<String>,
    pub appointment_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDirectorSubmission {
    #[serde(default)]
    pub company: CompanySubmission,
    #[serde(default)]
    pub director: DirectorSubmission,
    #[serde(default, rename = "otherCompanies")]
    pub other_companies: Vec<OtherCompany>,
}

impl CompanyDirectorSubmission {
    /// Check required fields and date formats, collecting every failure.
    pub fn validate(&self) -> CorpGraphResult<()> {
        let mut errors = Vec::new();

        if is_blank(&self.company.cin) {
            errors.push("CIN is required".to_string());
        }
        if is_blank(&self.company.name) {
            errors.push("Company name is required".to_string());
        }
        if is_blank(&self.director.din) {
            errors.push("DIN is required".to_string());
        }
        if is_blank(&self.director.name) {
            errors.push("Director name is required".to_string());
        }
        if is_blank(&self.director.designation) {
            errors.push("Designation is required".to_string());
        }

        if let Some(raw) = self.company.paid_capital.as_ref().filter(|v| !is_blank_value(v)) {
            if numeric(raw).is_none() {
                errors.push("Paid capital must be a number".to_string());
            }
        }
        check_date(&mut errors, "Incorporation date", self.company.inc_date.as_deref());
        check_date(&mut errors, "Appointment date", self.director.appointment_date.as_deref());

        for (i, other) in self.other_companies.iter().enumerate() {
            let n = i + 1;
            if is_blank(&other.cin) {
                errors.push(format!("Other company {}: CIN is required", n));
            }
            if is_blank(&other.name) {
                errors.push(format!("Other company {}: Company name is required", n));
            }
            check_date(
                &mut errors,
                &format!("Other company {}: Appointment date", n),
                other.appointment_date.as_deref(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CorpGraphError::Validation(errors))
        }
    }

    /// Designation on the edge to `other`, defaulting to the primary one.
    pub fn designation_for<'a>(&'a self, other: &'a OtherCompany) -> &'a str {
        present(other.designation.as_deref()).unwrap_or(&self.director.designation)
    }
}

/// A trimmed, non-empty optional field.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse an optional `YYYY-MM-DD` field; blank is absent.
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    present(value).and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
}

fn check_date(errors: &mut Vec<String>, field: &str, value: Option<&str>) {
    if let Some(v) = present(value) {
        if NaiveDate::parse_from_str(v, DATE_FORMAT).is_err() {
            errors.push(format!("{} must be YYYY-MM-DD", field));
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_blank_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => is_blank(s),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> CompanyDirectorSubmission {
        serde_json::from_value(json!({
            "company": {"cin": "U1", "name": "Acme", "inc_date": "2001-04-12", "paid_capital": "500000"},
            "director": {"din": "D1", "name": "Jane", "designation": "MD"},
            "otherCompanies": [{"cin": "U2", "name": "Beta"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_submission() {
        let submission = valid();
        assert!(submission.validate().is_ok());
        assert_eq!(submission.company.paid_capital_amount(), Some(500000.0));
        assert_eq!(submission.other_companies.len(), 1);
        assert_eq!(submission.designation_for(&submission.other_companies[0]), "MD");
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let submission: CompanyDirectorSubmission = serde_json::from_value(json!({
            "company": {"cin": "  "},
            "director": {}
        }))
        .unwrap();

        match submission.validate() {
            Err(CorpGraphError::Validation(errors)) => assert_eq!(
                errors,
                vec![
                    "CIN is required",
                    "Company name is required",
                    "DIN is required",
                    "Director name is required",
                    "Designation is required",
                ]
            ),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_bad_dates_and_capital() {
        let mut submission = valid();
        submission.company.inc_date = Some("12/04/2001".into());
        submission.company.paid_capital = Some(json!("lots"));
        submission.other_companies[0].appointment_date = Some("2020-13-01".into());

        let Err(CorpGraphError::Validation(errors)) = submission.validate() else {
            panic!("expected validation failure");
        };
        assert!(errors.contains(&"Incorporation date must be YYYY-MM-DD".to_string()));
        assert!(errors.contains(&"Paid capital must be a number".to_string()));
        assert!(errors.contains(&"Other company 1: Appointment date must be YYYY-MM-DD".to_string()));
    }

    #[test]
    fn test_other_company_designation_override_and_blank_dates() {
        let mut submission = valid();
        submission.other_companies[0].designation = Some("CFO".into());
        submission.director.appointment_date = Some(String::new());
        assert!(submission.validate().is_ok());
        assert_eq!(submission.designation_for(&submission.other_companies[0]), "CFO");
        assert_eq!(parse_date(Some("")), None);
        assert_eq!(parse_date(Some("2001-04-12")), NaiveDate::from_ymd_opt(2001, 4, 12));
    }

    #[test]
    fn test_serializes_other_companies_key() {
        let json = serde_json::to_value(valid()).unwrap();
        assert!(json.get("otherCompanies").is_some());
    }
}
