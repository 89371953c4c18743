//! The canonical structured job description and the JSON Schema the model must satisfy.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::llm_client::{LlmError, OutputSchema};

/// Schema / tool name shared by both provider strategies.
pub const SCHEMA_NAME: &str = "job_description";

/// Structured output of one generation call. Transient: flattened into
/// `JobPosting.description` and returned to the caller, never stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDescription {
    pub title: String,
    pub summary: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    /// Absent, null and empty are all treated as "no section".
    #[serde(default)]
    pub qualifications: Option<Vec<String>>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    pub tools: Vec<String>,
}

impl GeneratedDescription {
    /// Deserializes raw model output, normalizes it and checks the required fields.
    pub fn from_model_output(value: Value) -> Result<Self, LlmError> {
        let description: GeneratedDescription = serde_json::from_value(value)?;
        let description = description.normalized();
        description.validate()?;
        Ok(description)
    }

    /// Trims every field, folds line breaks inside the title and list items into
    /// single spaces, drops blank items and collapses empty optional lists to `None`.
    /// Items stay single-line so the composed text reads back unchanged.
    pub fn normalized(self) -> Self {
        Self {
            title: single_line(&self.title),
            summary: self.summary.trim().to_string(),
            responsibilities: clean_items(self.responsibilities),
            requirements: clean_items(self.requirements),
            qualifications: self.qualifications.map(clean_items).filter(|v| !v.is_empty()),
            benefits: self.benefits.map(clean_items).filter(|v| !v.is_empty()),
            tools: clean_items(self.tools),
        }
    }

    fn validate(&self) -> Result<(), LlmError> {
        if self.title.is_empty() {
            return Err(LlmError::Schema("title must not be empty".to_string()));
        }
        if self.summary.is_empty() {
            return Err(LlmError::Schema("summary must not be empty".to_string()));
        }
        Ok(())
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .iter()
        .map(|item| single_line(item))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Output contract for job description generation.
///
/// Every property is listed in `required` and optional lists are nullable,
/// which strict schema binding demands; tool-call binding accepts the same shape.
pub fn job_description_schema() -> OutputSchema {
    let string_list = json!({"type": "array", "items": {"type": "string"}});
    let nullable_string_list = json!({"type": ["array", "null"], "items": {"type": "string"}});

    OutputSchema {
        name: SCHEMA_NAME,
        description: "Record a structured job description with fixed sections.",
        schema: json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Job title as it should be advertised"},
                "summary": {"type": "string", "description": "Two to four sentence overview of the role"},
                "responsibilities": string_list.clone(),
                "requirements": string_list.clone(),
                "qualifications": nullable_string_list.clone(),
                "benefits": nullable_string_list,
                "tools": string_list
            },
            "required": [
                "title", "summary", "responsibilities", "requirements",
                "qualifications", "benefits", "tools"
            ],
            "additionalProperties": false
        }),
    }
}
