//! Job description generation: orchestrates the full flow for one job posting.
//!
//! Flow: load job → load company → build prompt → one structured LLM call →
//!       validate → compose text → persist description → return structured fields.
//!
//! Every failure returns before the write, so a description is never partially replaced.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::description::composer::compose_description;
use crate::description::prompts::build_description_prompt;
use crate::description::schema::{job_description_schema, GeneratedDescription};
use crate::errors::AppError;
use crate::llm_client::prompts::RECRUITER_SYSTEM;
use crate::llm_client::{StructuredGenerator, StructuredRequest};
use crate::store::RecordStore;

/// Request body for `POST /jobs/:job_id/description`.
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionRequest {
    pub required_tools: Vec<String>,
    /// Accepted for client compatibility; not used in the prompt.
    #[serde(default)]
    pub company_culture: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescriptionResponse {
    pub job_id: i64,
    pub structured_description: GeneratedDescription,
}

impl DescriptionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(pos) = self.required_tools.iter().position(|t| t.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "required_tools[{pos}] cannot be empty"
            )));
        }
        Ok(())
    }
}

/// Generates, stores and returns a structured description for `job_id`.
///
/// Steps:
/// 1. get_job() → NotFound if missing (no model call)
/// 2. get_company() → NotFound if missing (no model call)
/// 3. build_description_prompt()
/// 4. generator.generate() → exactly one provider call
/// 5. GeneratedDescription::from_model_output() → LlmOutput on non-conformant output
/// 6. compose_description() + set_job_description()
pub async fn generate_job_description(
    store: &dyn RecordStore,
    generator: &dyn StructuredGenerator,
    job_id: i64,
    request: DescriptionRequest,
) -> Result<DescriptionResponse, AppError> {
    request.validate()?;

    // Step 1–2: resolve records
    let job = store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {job_id} not found")))?;

    let company = store.get_company(job.company_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Company {} for job posting {job_id} not found",
            job.company_id
        ))
    })?;

    if request.company_culture.is_some() {
        debug!("Ignoring company_culture for job {job_id}");
    }

    // Step 3: prompt
    let prompt = build_description_prompt(&job, &company, &request.required_tools);
    let output = job_description_schema();

    // Step 4–5: structured generation
    info!(
        "Generating description for job {job_id} ({}) with {}",
        job.title,
        generator.model()
    );
    let raw = generator
        .generate(&StructuredRequest {
            system: RECRUITER_SYSTEM,
            prompt: &prompt,
            output: &output,
        })
        .await
        .map_err(|e| {
            warn!("Description generation failed for job {job_id}: {e}");
            AppError::from(e)
        })?;

    let structured = GeneratedDescription::from_model_output(raw).map_err(|e| {
        warn!("Model output for job {job_id} rejected: {e}");
        AppError::from(e)
    })?;

    // Step 6: compose and persist
    let text = compose_description(&structured);
    store
        .set_job_description(job_id, &text)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {job_id} not found")))?;

    info!(
        "Stored description for job {job_id}: {} responsibilities, {} requirements, {} tools",
        structured.responsibilities.len(),
        structured.requirements.len(),
        structured.tools.len()
    );

    Ok(DescriptionResponse {
        job_id,
        structured_description: structured,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
