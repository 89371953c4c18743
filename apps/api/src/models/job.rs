use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::{apply, present, required, Patch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "location_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Remote,
    Hybrid,
    Onsite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "employment_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Remote => "REMOTE",
            LocationType::Hybrid => "HYBRID",
            LocationType::Onsite => "ONSITE",
        }
    }
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "FULL_TIME",
            EmploymentType::PartTime => "PART_TIME",
            EmploymentType::Contract => "CONTRACT",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub company_id: i64,
    pub compensation_min: Option<f64>,
    pub compensation_max: Option<f64>,
    pub location_type: LocationType,
    pub employment_type: Option<EmploymentType>,
    pub is_active: Option<bool>,
    /// Free-text date as supplied by the client.
    pub created_at: Option<String>,
    /// Populated by the description generation flow.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobPostingCreate {
    pub title: String,
    pub company_id: i64,
    pub compensation_min: Option<f64>,
    pub compensation_max: Option<f64>,
    pub location_type: LocationType,
    pub employment_type: Option<EmploymentType>,
    pub is_active: Option<bool>,
    pub created_at: Option<String>,
    pub description: Option<String>,
}

/// Partial update: fields present in the body overwrite, `null` clears a
/// nullable field, absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPostingUpdate {
    #[serde(default, deserialize_with = "present")]
    pub title: Patch<String>,
    #[serde(default, deserialize_with = "present")]
    pub company_id: Patch<i64>,
    #[serde(default, deserialize_with = "present")]
    pub compensation_min: Patch<f64>,
    #[serde(default, deserialize_with = "present")]
    pub compensation_max: Patch<f64>,
    #[serde(default, deserialize_with = "present")]
    pub location_type: Patch<LocationType>,
    #[serde(default, deserialize_with = "present")]
    pub employment_type: Patch<EmploymentType>,
    #[serde(default, deserialize_with = "present")]
    pub is_active: Patch<bool>,
    #[serde(default, deserialize_with = "present")]
    pub created_at: Patch<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Patch<String>,
}

impl JobPostingCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_job_fields(&self.title, self.compensation_min, self.compensation_max)
    }
}

impl JobPostingUpdate {
    /// Merges the update into `job` and validates the result.
    /// Whether a new `company_id` resolves is the caller's concern.
    pub fn apply_to(self, job: &mut JobPosting) -> Result<(), AppError> {
        if let Some(title) = required("title", self.title)? {
            job.title = title;
        }
        if let Some(company_id) = required("company_id", self.company_id)? {
            job.company_id = company_id;
        }
        if let Some(location_type) = required("location_type", self.location_type)? {
            job.location_type = location_type;
        }
        apply(&mut job.compensation_min, self.compensation_min);
        apply(&mut job.compensation_max, self.compensation_max);
        apply(&mut job.employment_type, self.employment_type);
        apply(&mut job.is_active, self.is_active);
        apply(&mut job.created_at, self.created_at);
        apply(&mut job.description, self.description);
        validate_job_fields(&job.title, job.compensation_min, job.compensation_max)
    }
}

fn validate_job_fields(
    title: &str,
    compensation_min: Option<f64>,
    compensation_max: Option<f64>,
) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if let (Some(min), Some(max)) = (compensation_min, compensation_max) {
        if min > max {
            return Err(AppError::Validation(format!(
                "compensation_min ({min}) cannot exceed compensation_max ({max})"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobPosting {
        JobPosting {
            id: 6,
            title: "Data Engineer".to_string(),
            company_id: 1,
            compensation_min: Some(120_000.0),
            compensation_max: Some(150_000.0),
            location_type: LocationType::Remote,
            employment_type: Some(EmploymentType::FullTime),
            is_active: Some(true),
            created_at: Some("2025-03-01".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_enums_use_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_string(&EmploymentType::FullTime).unwrap();
        assert_eq!(json, r#""FULL_TIME""#);
        let loc: LocationType = serde_json::from_str(r#""ONSITE""#).unwrap();
        assert_eq!(loc, LocationType::Onsite);
        assert!(serde_json::from_str::<LocationType>(r#""onsite""#).is_err());
    }

    #[test]
    fn test_create_deserializes_with_only_required_fields() {
        let json = r#"{"title": "ML Engineer", "company_id": 3, "location_type": "HYBRID"}"#;
        let create: JobPostingCreate = serde_json::from_str(json).unwrap();
        assert_eq!(create.company_id, 3);
        assert!(create.employment_type.is_none());
        assert!(create.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_inverted_compensation() {
        let json = r#"{"title": "ML Engineer", "company_id": 3, "location_type": "HYBRID",
                       "compensation_min": 200000, "compensation_max": 100000}"#;
        let create: JobPostingCreate = serde_json::from_str(json).unwrap();
        assert!(matches!(create.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let mut posting = job();
        JobPostingUpdate {
            is_active: Some(Some(false)),
            ..Default::default()
        }
        .apply_to(&mut posting)
        .unwrap();

        assert_eq!(posting.is_active, Some(false));
        assert_eq!(posting.title, "Data Engineer");
        assert_eq!(posting.employment_type, Some(EmploymentType::FullTime));
    }

    #[test]
    fn test_update_validates_merged_compensation() {
        let mut posting = job();
        let result = JobPostingUpdate {
            compensation_min: Some(Some(160_000.0)),
            ..Default::default()
        }
        .apply_to(&mut posting);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_null_clears_nullable_fields() {
        let mut posting = job();
        posting.description = Some("Old text".to_string());
        let update: JobPostingUpdate = serde_json::from_str(
            r#"{"description": null, "employment_type": null, "is_active": null}"#,
        )
        .unwrap();
        update.apply_to(&mut posting).unwrap();

        assert!(posting.description.is_none());
        assert!(posting.employment_type.is_none());
        assert!(posting.is_active.is_none());
        assert_eq!(posting.compensation_max, Some(150_000.0));
    }

    #[test]
    fn test_update_null_required_column_is_rejected() {
        for body in [
            r#"{"title": null}"#,
            r#"{"company_id": null}"#,
            r#"{"location_type": null}"#,
        ] {
            let mut posting = job();
            let update: JobPostingUpdate = serde_json::from_str(body).unwrap();
            assert!(
                matches!(update.apply_to(&mut posting), Err(AppError::Validation(_))),
                "{body} should be rejected"
            );
        }
    }
}
