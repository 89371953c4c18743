use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Submitted,
    Reviewing,
    Rejected,
    Hired,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    pub candidate_name: String,
    pub candidate_email: String,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Body of `POST /jobs/:job_id/applications`. The job comes from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationCreate {
    pub candidate_name: String,
    pub candidate_email: String,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
}

impl ApplicationCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.candidate_name.trim().is_empty() {
            return Err(AppError::Validation(
                "candidate_name cannot be empty".to_string(),
            ));
        }
        let email = self.candidate_email.trim();
        let valid_email = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !valid_email {
            return Err(AppError::Validation(format!(
                "candidate_email '{email}' is not a valid email address"
            )));
        }
        Ok(())
    }
}
