use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::{apply, present, required, Patch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub url: Option<String>,
    pub headcount: Option<i32>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyCreate {
    pub name: String,
    pub industry: Option<String>,
    pub url: Option<String>,
    pub headcount: Option<i32>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

/// Partial update: fields present in the body overwrite, `null` clears a
/// nullable field, absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyUpdate {
    #[serde(default, deserialize_with = "present")]
    pub name: Patch<String>,
    #[serde(default, deserialize_with = "present")]
    pub industry: Patch<String>,
    #[serde(default, deserialize_with = "present")]
    pub url: Patch<String>,
    #[serde(default, deserialize_with = "present")]
    pub headcount: Patch<i32>,
    #[serde(default, deserialize_with = "present")]
    pub country: Patch<String>,
    #[serde(default, deserialize_with = "present")]
    pub state: Patch<String>,
    #[serde(default, deserialize_with = "present")]
    pub city: Patch<String>,
}

impl CompanyCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_company_fields(&self.name, self.url.as_deref(), self.headcount)
    }
}

impl CompanyUpdate {
    /// Merges the update into `company` and validates the result.
    pub fn apply_to(self, company: &mut Company) -> Result<(), AppError> {
        if let Some(name) = required("name", self.name)? {
            company.name = name;
        }
        apply(&mut company.industry, self.industry);
        apply(&mut company.url, self.url);
        apply(&mut company.headcount, self.headcount);
        apply(&mut company.country, self.country);
        apply(&mut company.state, self.state);
        apply(&mut company.city, self.city);
        validate_company_fields(&company.name, company.url.as_deref(), company.headcount)
    }
}

fn validate_company_fields(
    name: &str,
    url: Option<&str>,
    headcount: Option<i32>,
) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if let Some(url) = url {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| AppError::Validation(format!("url is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Validation(
                "url must use the http or https scheme".to_string(),
            ));
        }
    }
    if matches!(headcount, Some(h) if h < 0) {
        return Err(AppError::Validation(
            "headcount cannot be negative".to_string(),
        ));
    }
    Ok(())
}
